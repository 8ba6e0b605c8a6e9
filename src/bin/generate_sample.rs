use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{QuoteStyle, Writer, WriterBuilder};

const HDEN: [f64; 2] = [3.5, 4.0];
const LINE_LABEL: &str = "H2   2.121m";

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Synthetic line emissivity: a bump in temperature scaled by density.
fn emissivity(hden: f64, temperature: f64, rng: &mut SimpleRng) -> f64 {
    let peak = gaussian(temperature, 1500.0, 600.0, 1.0);
    let log_emis = -25.0 + 2.0 * (hden - 3.5) + 3.0 * peak;
    log_emis + rng.gauss(0.0, 0.01)
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn tab_writer(path: &Path) -> Result<Writer<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .from_writer(file))
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // Temperatures: 100 → 4000, step 50
    let temperatures: Vec<f64> = (0..79).map(|i| 100.0 + i as f64 * 50.0).collect();
    let points: Vec<(f64, f64)> = HDEN
        .iter()
        .flat_map(|&h| temperatures.iter().map(move |&t| (h, t)))
        .collect();

    let grd_path = out_dir.join("sample.grd");
    let mut grd = tab_writer(&grd_path)?;
    grd.write_record([
        "#Index",
        "Failure?",
        "Warnings?",
        "Exit code",
        "#rank",
        "#seq",
        "grid parameter string",
        "",
    ])?;
    grd.write_record(["# hden, Temperature"])?;
    for (i, (hden, temperature)) in points.iter().enumerate() {
        let index = i.to_string();
        let params = format!("{hden:.6}, {temperature:.6}");
        grd.write_record([
            index.as_str(),
            "F",
            "F",
            "ok",
            "0",
            index.as_str(),
            params.as_str(),
            "",
        ])?;
    }
    grd.flush()?;

    let ems_path = out_dir.join("sample.ems");
    let mut ems = tab_writer(&ems_path)?;
    ems.write_record(["#depth", LINE_LABEL])?;
    ems.write_record(["# line emissivity, log erg/cm3/s"])?;
    for &(hden, temperature) in &points {
        let depth = 1.0e15 / 10f64.powf(hden);
        ems.write_record([
            format!("{depth:.4e}"),
            format!("{:.4}", emissivity(hden, temperature, &mut rng)),
        ])?;
    }
    ems.flush()?;

    println!(
        "Wrote {} grid points ({} × {}) to {} and {}",
        points.len(),
        HDEN.len(),
        temperatures.len(),
        grd_path.display(),
        ems_path.display()
    );
    Ok(())
}
