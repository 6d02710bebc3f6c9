//! Rasterizes a pseudo-random 50-spoke star and writes the coverage as a
//! binary PGM (P5) image on stdout:
//!
//! ```sh
//! cargo run --example randstar > star.pgm
//! ```

use sable::math::point;
use sable::path::{FillRule, Path};
use sable::raster::paint::gray_svp_aa;
use sable::raster::fill_path_to_svp;

use std::io::{self, Write};

/// Classic multiplicative congruential generator, fixed seed for a
/// reproducible image.
struct Rand(u32);

impl Rand {
    fn next(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((self.0 >> 16) & 0x7fff) as f64 / 32768.0
    }
}

fn randstar(n: usize) -> Path {
    let mut rng = Rand(1);
    let mut builder = Path::builder();
    for i in 0..n {
        let r = 250.0 * rng.next();
        let th = i as f64 * 2.0 * std::f64::consts::PI / n as f64;
        let p = point(250.0 + r * th.cos(), 250.0 - r * th.sin());
        if i == 0 {
            builder.begin(p);
        } else {
            builder.line_to(p);
        }
    }
    builder.close();
    builder.build()
}

fn main() -> io::Result<()> {
    const SIZE: i32 = 512;

    let star = randstar(50);
    let svp = fill_path_to_svp(&star, FillRule::NonZero).expect("rasterization failed");

    let mut buf = vec![0u8; (SIZE * SIZE) as usize];
    gray_svp_aa(&svp, 0, 0, SIZE, SIZE, &mut buf, SIZE as usize);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "P5\n{} {}\n255\n", SIZE, SIZE)?;
    out.write_all(&buf)?;
    Ok(())
}
