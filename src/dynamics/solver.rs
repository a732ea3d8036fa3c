//! The substepped position-based solver behind
//! [`DynamicAnimator::step`][super::DynamicAnimator::step].
//!
//! Each substep predicts the pose with a semi-implicit Euler step,
//! corrects corner-vs-wall penetration positionally, recomputes velocity
//! from the pose delta, then runs a velocity pass for restitution and
//! dynamic friction.

use itertools::iproduct;

use super::{CollisionBehavior, GravityBehavior, ItemBehavior, ProxyItem};
use crate::math as m;

/// A corner of the item touching one of the boundary walls.
struct Contact {
    /// Corner offset from the center of mass, in local space.
    offset: m::Vec2,
    /// Inward wall normal.
    normal: m::Unit<m::Vec2>,
    /// A point on the wall.
    wall_point: m::Vec2,
    /// Accumulated positional impulse, kept for the friction Coulomb limit.
    lambda_n: f64,
}

pub(super) fn step(
    proxy: &mut ProxyItem,
    item: &ItemBehavior,
    gravity: Option<&GravityBehavior>,
    collision: Option<&CollisionBehavior>,
    gravity_scale: f64,
    substeps: usize,
    dt: f64,
) {
    let dt = dt / substeps as f64;
    let inv_dt = 1.0 / dt;

    let inv_mass = item.inverse_mass();
    let inv_mom_inertia = item.inverse_moment_of_inertia();
    let ext_accel = gravity
        .map(|g| g.direction * gravity_scale)
        .unwrap_or_else(m::Vec2::zero);

    for _substep in 0..substeps {
        //
        // apply external forces and predict the pose with a semi-implicit Euler step
        //
        proxy.velocity.linear += ext_accel * dt;
        let old_vel = proxy.velocity;
        let old_pose = proxy.pose;
        proxy.pose = proxy.velocity.apply_to_pose(dt, proxy.pose);

        //
        // gather corner-vs-wall contacts at the predicted pose
        //
        let mut contacts: Vec<Contact> = match collision {
            Some(collision) => iproduct!(item.collider.corners(), collision.bounds.walls())
                .filter_map(|(offset, (wall_point, normal))| {
                    let corner = proxy.pose * offset;
                    let depth = (wall_point - corner).dot(*normal);
                    (depth > 0.0).then_some(Contact {
                        offset,
                        normal,
                        wall_point,
                        lambda_n: 0.0,
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        //
        // positional solve, one Nonlinear Gauss-Seidel pass
        // (accuracy comes from substepping)
        //
        for contact in &mut contacts {
            // depth is recomputed here because earlier corrections can change it
            let corner = proxy.pose * contact.offset;
            let depth = (contact.wall_point - corner).dot(*contact.normal);
            if depth <= 0.0 {
                contact.lambda_n = 0.0;
                continue;
            }

            let offset_rotated = proxy.pose.rotation * contact.offset;
            let offset_wedge_normal = offset_rotated.wedge(*contact.normal).xy;
            let eff_inv_mass = inv_mass + offset_wedge_normal.powi(2) * inv_mom_inertia;

            let lambda_n = depth / eff_inv_mass;
            contact.lambda_n = lambda_n;

            proxy
                .pose
                .append_translation(inv_mass * lambda_n * *contact.normal);
            proxy.pose.prepend_rotation(
                m::Angle::Rad(inv_mom_inertia * lambda_n * offset_wedge_normal).into(),
            );

            // static friction: cancel tangential motion accumulated this
            // substep, up to the Coulomb limit from the normal correction
            let tangent = m::left_normal(*contact.normal);
            let corner_after = proxy.pose * contact.offset;
            let corner_before = old_pose * contact.offset;
            let motion_along_tan = (corner_after - corner_before).dot(tangent);

            let offset_wedge_tan = offset_rotated.wedge(tangent).xy;
            let eff_inv_mass_tan = inv_mass + offset_wedge_tan.powi(2) * inv_mom_inertia;
            let lambda_t = -motion_along_tan / eff_inv_mass_tan;

            if lambda_t.abs() < lambda_n * item.friction {
                proxy.pose.append_translation(inv_mass * lambda_t * tangent);
                proxy.pose.prepend_rotation(
                    m::Angle::Rad(inv_mom_inertia * lambda_t * offset_wedge_tan).into(),
                );
            }
        }

        //
        // update velocity from the pose difference
        //
        proxy.velocity.linear = (proxy.pose.translation - old_pose.translation) * inv_dt;
        proxy.velocity.angular =
            m::Angle::from(proxy.pose.rotation * old_pose.rotation.reversed()).rad() * inv_dt;

        //
        // velocity pass: restitution and dynamic friction per contact
        //
        for contact in &contacts {
            if contact.lambda_n == 0.0 {
                continue;
            }
            let offset_rotated = proxy.pose.rotation * contact.offset;
            let vel_at_p = proxy.velocity.point_velocity(offset_rotated);

            // restitution against the pre-collision approach speed,
            // with no bounce below what gravity adds in one substep to avoid jitter
            let normal_vel = vel_at_p.dot(*contact.normal);
            let old_normal_vel = old_vel.point_velocity(offset_rotated).dot(*contact.normal);
            let approach_speed = (-old_normal_vel).max(0.0);
            let elasticity = if old_normal_vel * old_normal_vel < dt * dt * ext_accel.mag_sq() {
                0.0
            } else {
                item.elasticity
            };
            let delta_normal_vel = -normal_vel + elasticity * approach_speed;

            // dynamic friction clamped by the Coulomb limit
            // derived from the positional impulse
            let tangent = m::left_normal(*contact.normal);
            let tangent_vel = vel_at_p.dot(tangent);
            let max_coulomb_dv = inv_dt * contact.lambda_n * item.friction;
            let delta_tan_vel = tangent_vel.abs().min(max_coulomb_dv.abs()) * -tangent_vel.signum();

            let total_vel_update = delta_normal_vel * *contact.normal + delta_tan_vel * tangent;
            let vel_update_mag = total_vel_update.mag();
            if vel_update_mag < 0.0001 {
                continue;
            }
            let vel_update_dir = total_vel_update / vel_update_mag;
            let offset_wedge_dv = offset_rotated.wedge(vel_update_dir).xy;
            let eff_inv_mass = inv_mass + offset_wedge_dv.powi(2) * inv_mom_inertia;
            let impulse_mag = vel_update_mag / eff_inv_mass;

            proxy.velocity.linear += inv_mass * impulse_mag * vel_update_dir;
            proxy.velocity.angular += inv_mom_inertia * impulse_mag * offset_wedge_dv;
        }
    }
}
