//! Star field demo
//!
//! Builds a random star cloud, orbits a camera around it for a handful of
//! frames and logs aggregate pipeline statistics. Headless: exercises the
//! full geometry and per-frame math without a window or GPU.

use rand::{rngs::StdRng, Rng, SeedableRng};
use splat_engine::prelude::*;

const CONFIG: &str = r#"
profile = "particle"
antialias = 0.05
"#;

const STAR_COUNT: usize = 10_000;
const FRAMES: usize = 8;

fn build_star_field(seed: u64) -> Result<ParticleSet, ShapeError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let coords: Vec<Vec3> = (0..STAR_COUNT)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            )
        })
        .collect();
    let sizes: Vec<f32> = (0..STAR_COUNT).map(|_| rng.gen_range(0.2..1.5)).collect();
    let intensities: Vec<f32> = (0..STAR_COUNT).map(|_| rng.gen_range(0.2..1.0)).collect();

    ParticleSetBuilder::new(coords)
        .size(sizes)
        .values(intensities)
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SplatConfig::from_toml_str(CONFIG)?;
    log::info!(
        "star field demo: {} stars, profile '{}', antialias {}",
        STAR_COUNT,
        config.profile,
        config.antialias
    );

    let stars = build_star_field(42)?;
    if let Some((min, max)) = stars.extent() {
        log::info!("data extent: {min:?} .. {max:?}");
    }

    let pipeline = SplatPipeline::new(&config)?;
    let mut camera = Camera::perspective(Vec3::new(0.0, 50.0, 320.0), 45.0, 16.0 / 9.0, 0.1, 2000.0);

    for i in 0..FRAMES {
        // orbit around the cloud
        let angle = i as f32 / FRAMES as f32 * std::f32::consts::TAU;
        camera.set_position(Vec3::new(320.0 * angle.sin(), 50.0, 320.0 * angle.cos()));
        camera.look_at(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));

        let frame = camera.frame()?;
        let outputs = pipeline.process_frame(&frame, stars.buffers());

        let locked = outputs.iter().filter(|o| o.scale_intensity > 1.0).count();
        let mean_depth =
            outputs.iter().map(|o| o.depth).sum::<f32>() / outputs.len().max(1) as f32;
        let center_intensity: f32 = outputs
            .iter()
            .step_by(4)
            .filter_map(|o| pipeline.shade(Vec2::zeros(), o))
            .sum();
        log::info!(
            "frame {i}: {} vertices, {locked} size-locked, mean depth {mean_depth:.4}, summed center intensity {center_intensity:.1}",
            outputs.len()
        );
    }

    Ok(())
}
