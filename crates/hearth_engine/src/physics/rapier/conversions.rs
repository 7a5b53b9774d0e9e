//! Conversions between engine math types and rapier's nalgebra types

use rapier3d::math::{Isometry, Real};
use rapier3d::na;

use crate::foundation::math::{Iso3, Quat, Quaternion, Translation3, Vec3};

pub(super) fn to_rapier_vec(v: &Vec3) -> na::Vector3<Real> {
    na::Vector3::new(v.x, v.y, v.z)
}

pub(super) fn from_rapier_vec(v: &na::Vector3<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(super) fn from_rapier_point(p: &na::Point3<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub(super) fn to_rapier_iso(iso: &Iso3) -> Isometry<Real> {
    let t = &iso.translation.vector;
    let q = &iso.rotation;
    Isometry::from_parts(
        na::Translation3::new(t.x, t.y, t.z),
        na::UnitQuaternion::new_normalize(na::Quaternion::new(q.w, q.i, q.j, q.k)),
    )
}

pub(super) fn from_rapier_iso(iso: &Isometry<Real>) -> Iso3 {
    let t = &iso.translation.vector;
    let q = &iso.rotation;
    Iso3::from_parts(
        Translation3::new(t.x, t.y, t.z),
        Quat::new_normalize(Quaternion::new(q.w, q.i, q.j, q.k)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn isometries_survive_the_boundary() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), 0.6);
        let iso = Iso3::from_parts(Translation3::new(1.0, -2.0, 3.0), rotation);
        let back = from_rapier_iso(&to_rapier_iso(&iso));
        assert_relative_eq!(back.translation.vector, iso.translation.vector);
        assert_relative_eq!(back.rotation, iso.rotation, epsilon = 1e-6);
    }
}
