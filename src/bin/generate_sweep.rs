//! Generate synthetic VNA sweep files for trying out the pipeline:
//! one reference (zero delay) and a handful of DUT sweeps with programmed
//! delays plus measurement noise.
//!
//! ```sh
//! cargo run --bin generate_sweep
//! vna-tdr track --reference reference.s2p --distance-mm 10 dut_*.s2p
//! ```

use std::f64::consts::PI;
use std::fmt::Write as _;

use num_complex::Complex64;

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Render one sweep with the S21 columns carrying a delayed unit response.
fn sweep_text(
    frequencies: &[f64],
    delay: f64,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> String {
    let mut text = String::from("! synthetic sweep generated by generate_sweep\n# Hz S RI R 50\n");
    for &f in frequencies {
        let s21 = Complex64::from_polar(1.0, -2.0 * PI * f * delay)
            + Complex64::new(
                rng.gauss(0.0, noise_level),
                rng.gauss(0.0, noise_level),
            );
        writeln!(
            text,
            "{f:e}  0.0 0.0  {:.12} {:.12}  0.0 0.0  0.0 0.0",
            s21.re, s21.im
        )
        .expect("write to string");
    }
    text
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // 1–2 GHz, 101 points, the sweep shape the tool is usually fed.
    let frequencies: Vec<f64> = (0..101).map(|i| 1.0e9 + i as f64 * 1.0e7).collect();

    // Delays a 10 mm path would produce for a few materials (2·d·(√εᵣ−1)/c
    // puts PTFE around 30 ps and alumina around 140 ps; round figures here).
    let duts = [
        ("dut_ptfe.s2p", 30.0e-12),
        ("dut_fr4.s2p", 75.0e-12),
        ("dut_alumina.s2p", 140.0e-12),
    ];

    let reference = sweep_text(&frequencies, 0.0, 0.002, &mut rng);
    std::fs::write("reference.s2p", reference).expect("Failed to write reference sweep");

    for (name, delay) in duts {
        let text = sweep_text(&frequencies, delay, 0.002, &mut rng);
        std::fs::write(name, text).expect("Failed to write DUT sweep");
    }

    println!(
        "Wrote reference.s2p and {} DUT sweeps ({} points each)",
        duts.len(),
        frequencies.len()
    );
}
