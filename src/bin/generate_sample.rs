use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write synthetic `<experiment>_<node>.csv` upload-time files.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Output directory
    #[arg(default_value = "sample_data")]
    out_dir: PathBuf,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// xoshiro256** seeded through splitmix64, so nearby seeds still give
/// unrelated streams.
struct UploadRng {
    s: [u64; 4],
}

impl UploadRng {
    fn seeded(seed: u64) -> Self {
        let mut z = seed;
        let s = std::array::from_fn(|_| {
            z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut x = z;
            x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            x ^ (x >> 31)
        });
        UploadRng { s }
    }

    fn next_u64(&mut self) -> u64 {
        let [a, b, c, d] = self.s;
        let out = b.wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let c = c ^ a;
        let d = d ^ b;
        self.s = [a ^ d, b ^ c, c ^ (b << 17), d.rotate_left(45)];
        out
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform in `[lo, hi)`.
    fn between(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo)
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let r = (-2.0 * self.unit().max(f64::MIN_POSITIVE).ln()).sqrt();
        let theta = std::f64::consts::TAU * self.unit();
        mean + std_dev * r * theta.cos()
    }
}

/// One node's uploads: roughly one per minute, a few seconds of transit
/// delay, and now and then an outage during which uploads queue up and
/// arrive together when it ends.
fn generate_uploads(rows: usize, start: i64, rng: &mut UploadRng) -> Vec<(i64, i64)> {
    let mut created = start;
    let mut outage_until: Option<i64> = None;
    let mut uploads = Vec::with_capacity(rows);

    for _ in 0..rows {
        created += rng.between(30, 90) as i64;
        if outage_until.is_none() && rng.unit() < 0.03 {
            outage_until = Some(created + rng.between(600, 3600) as i64);
        }

        let transit = rng.normal(5.0, 2.0).abs().round() as i64;
        let received = match outage_until.filter(|&end| created < end) {
            Some(end) => end + transit,
            None => {
                outage_until = None;
                created + transit
            }
        };
        uploads.push((created, received));
    }
    uploads
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = UploadRng::seeded(args.seed);

    let experiments = ["baseline", "throttled"];
    let nodes = ["OW2CB0", "OW4F1A", "OW9E77"];

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut files = 0;
    for experiment in experiments {
        for node in nodes {
            // Roughly one file in four stays under the plotting threshold.
            let rows = if rng.unit() < 0.25 {
                rng.between(5, 30) as usize
            } else {
                rng.between(40, 400) as usize
            };
            let start = 1_330_000_000 + rng.between(0, 86_400) as i64;
            let uploads = generate_uploads(rows, start, &mut rng);

            let path = args.out_dir.join(format!("{experiment}_{node}.csv"));
            let mut writer = csv::Writer::from_path(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            for (created, received) in &uploads {
                writer.write_record([created.to_string(), received.to_string()])?;
            }
            writer.flush()?;
            files += 1;
        }
    }

    println!("Wrote {files} upload CSVs to {}", args.out_dir.display());
    Ok(())
}
