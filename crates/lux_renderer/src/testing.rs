//! Scenes shared by the unit tests.

use lux_core::{Material, Scene};
use lux_math::Vec3;

/// Add the quad `a b c d` as two triangles.
pub fn add_quad(scene: &mut Scene, [a, b, c, d]: [Vec3; 4], material: usize) {
    scene.add_triangle(a, b, c, material).unwrap();
    scene.add_triangle(a, c, d, material).unwrap();
}

/// Axis-aligned grey cube of half-size `h` centred on the origin, light at the centre.
pub fn closed_box(h: f32) -> Scene {
    let mut scene = Scene::new("box");
    let m = scene.add_material(Material::default());
    let v = |x: f32, y: f32, z: f32| Vec3::new(x * h, y * h, z * h);

    let faces = [
        [v(-1., -1., -1.), v(1., -1., -1.), v(1., -1., 1.), v(-1., -1., 1.)], // floor
        [v(-1., 1., -1.), v(-1., 1., 1.), v(1., 1., 1.), v(1., 1., -1.)],     // ceiling
        [v(-1., -1., -1.), v(-1., 1., -1.), v(1., 1., -1.), v(1., -1., -1.)], // back
        [v(-1., -1., 1.), v(1., -1., 1.), v(1., 1., 1.), v(-1., 1., 1.)],     // front
        [v(-1., -1., -1.), v(-1., -1., 1.), v(-1., 1., 1.), v(-1., 1., -1.)], // left
        [v(1., -1., -1.), v(1., 1., -1.), v(1., 1., 1.), v(1., -1., 1.)],     // right
    ];
    for face in faces {
        add_quad(&mut scene, face, m);
    }
    scene
}
