use anyhow::{Context, Result};

/// SplitMix64 stream: deterministic, seedable, good enough for fake data.
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn seeded(seed: u64) -> Self {
        SampleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Log-uniform draw, for quantities spanning decades (period, depth).
    fn log_uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.uniform(lo.ln(), hi.ln()).exp()
    }
}

/// Per-disposition parameter ranges: (name, share, radius range, snr range).
const CLASSES: [(&str, f64, (f64, f64), (f64, f64)); 3] = [
    ("CONFIRMED", 0.3, (0.6, 14.0), (10.0, 400.0)),
    ("CANDIDATE", 0.25, (0.5, 20.0), (7.0, 60.0)),
    ("FALSE POSITIVE", 0.45, (1.0, 90.0), (7.0, 3000.0)),
];

const ROWS: usize = 600;

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SampleRng::seeded(42);

    let output_path = "sample_koi.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "kepoi_name",
        "koi_disposition",
        "koi_period",
        "koi_depth",
        "koi_duration",
        "koi_prad",
        "koi_steff",
        "koi_model_snr",
        "koi_teq",
        "ra",
        "dec",
    ])?;

    for i in 0..ROWS {
        let pick = rng.next_f64();
        let mut acc = 0.0;
        let (disposition, _, radius, snr) = CLASSES
            .iter()
            .copied()
            .find(|(_, share, _, _)| {
                acc += share;
                pick < acc
            })
            .unwrap_or(CLASSES[2]);

        let period = rng.log_uniform(0.5, 500.0);
        let prad = rng.log_uniform(radius.0, radius.1);
        let steff = rng.uniform(3500.0, 7000.0);
        // Equilibrium temperature falls with orbital distance (~ P^-1/3).
        let teq = steff * 0.25 * period.powf(-1.0 / 3.0) * rng.uniform(0.8, 1.2);
        let depth = 84.0 * prad * prad * rng.uniform(0.7, 1.3);
        let duration = 2.0 * period.powf(1.0 / 3.0) * rng.uniform(0.6, 1.4);

        // Leave occasional gaps the way the archive export does.
        let maybe = |v: f64, rng: &mut SampleRng| {
            if rng.next_f64() < 0.04 {
                String::new()
            } else {
                format!("{v:.4}")
            }
        };

        writer.write_record([
            format!("K{:05}.01", i + 1),
            disposition.to_string(),
            format!("{period:.6}"),
            maybe(depth, &mut rng),
            maybe(duration, &mut rng),
            maybe(prad, &mut rng),
            format!("{steff:.0}"),
            maybe(rng.log_uniform(snr.0, snr.1), &mut rng),
            maybe(teq, &mut rng),
            format!("{:.5}", rng.uniform(280.0, 302.0)),
            format!("{:.5}", rng.uniform(36.5, 52.5)),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {ROWS} objects to {output_path}");
    Ok(())
}
