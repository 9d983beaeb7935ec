use std::{fs::File, io::BufWriter, path::Path};

use log::{debug, info};
use nanorand::{Rng, WyRand};

/// Which statistics [`compute_stats`] should collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Analysis {
    pub avalanche: bool,
    /// Bit independence criterion.  Quadratic in the output size.
    pub bic: bool,
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            avalanche: true,
            bic: false,
        }
    }
}

pub struct Stats {
    pub input_bit_len: usize,
    pub output_bit_len: usize,
    pub digest_bit_len: usize,

    // The number of samples accumulated.  Or put another way, the number of
    // rounds used to generate the chart.
    pub sample_count: usize,

    // `input_bit_len * output_bit_len` long.  Each element is a count of the
    // number of bit flips for a given in/out bit pairing.
    pub avalanche_chart: Vec<u32>,

    // For every input bit, the BIC quadrants for each pair of output bits.
    pub bic_chart: Vec<[u32; 4]>,
}

impl Stats {
    pub fn new(
        input_bit_len: usize,
        output_bit_len: usize,
        digest_bit_len: usize,
        analysis: Analysis,
    ) -> Self {
        Self {
            input_bit_len,
            output_bit_len,
            digest_bit_len,
            sample_count: 0,
            avalanche_chart: if analysis.avalanche {
                vec![0; input_bit_len * output_bit_len]
            } else {
                Vec::new()
            },
            bic_chart: if analysis.bic {
                vec![[0; 4]; input_bit_len * output_bit_len * (output_bit_len - 1)]
            } else {
                Vec::new()
            },
        }
    }

    pub fn accumulate(&mut self, in_bit: usize, out_bit: usize, flipped: bool) {
        self.avalanche_chart[in_bit * self.output_bit_len + out_bit] += flipped as u32;
    }

    pub fn get(&self, in_bit: usize, out_bit: usize) -> u32 {
        self.avalanche_chart[in_bit * self.output_bit_len + out_bit]
    }

    pub fn get_row(&self, in_bit: usize) -> &[u32] {
        let start = in_bit * self.output_bit_len;
        &self.avalanche_chart[start..start + self.output_bit_len]
    }

    fn norm(&self) -> f64 {
        1.0 / self.sample_count as f64
    }

    /// Sum over output bits of how close each one is to a fair coin flip.
    pub fn row_diffusion(&self, in_bit: usize) -> f64 {
        let norm = self.norm();
        self.get_row(in_bit)
            .iter()
            .map(|&flips| 1.0 - p_to_bias(flips as f64 * norm))
            .sum()
    }

    pub fn row_entropy(&self, in_bit: usize) -> f64 {
        let norm = self.norm();
        self.get_row(in_bit)
            .iter()
            .map(|&flips| p_to_entropy(flips as f64 * norm))
            .sum()
    }

    pub fn average_bias(&self) -> f64 {
        let norm = self.norm();
        let bias_sum: f64 = self
            .avalanche_chart
            .iter()
            .map(|&flips| p_to_bias(flips as f64 * norm))
            .sum();
        bias_sum / self.avalanche_chart.len() as f64
    }

    pub fn min_bias(&self) -> f64 {
        let norm = self.norm();
        self.avalanche_chart
            .iter()
            .map(|&flips| p_to_bias(flips as f64 * norm))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_bias(&self) -> f64 {
        let norm = self.norm();
        self.avalanche_chart
            .iter()
            .map(|&flips| p_to_bias(flips as f64 * norm))
            .fold(0.0, f64::max)
    }

    /// Min, average and max of `row` over all input bits.
    fn row_summary(&self, row: impl Fn(usize) -> f64) -> [f64; 3] {
        let mut min = f64::INFINITY;
        let mut sum = 0.0;
        let mut max = 0.0f64;
        for i in 0..self.input_bit_len {
            let n = row(i);
            min = min.min(n);
            sum += n;
            max = max.max(n);
        }
        [min, sum / self.input_bit_len as f64, max]
    }

    pub fn input_bit_diffusion(&self) -> [f64; 3] {
        self.row_summary(|i| self.row_diffusion(i))
    }

    pub fn input_bit_entropy(&self) -> [f64; 3] {
        self.row_summary(|i| self.row_entropy(i))
    }

    fn bic_row(&self, in_bit_idx: usize) -> &[[u32; 4]] {
        let stride = self.output_bit_len * (self.output_bit_len - 1);
        let start = in_bit_idx * stride;
        &self.bic_chart[start..start + stride]
    }

    pub fn row_bic_avg_deviation(&self, in_bit_idx: usize) -> f64 {
        let bic = self.bic_row(in_bit_idx);

        let mut sum = 0.0;
        for [a, b, c, d] in bic.iter() {
            let min = *a.min(b).min(c).min(d);
            let max = *a.max(b).max(c).max(d);
            if max > 0 {
                sum += (max - min) as f64 / max as f64;
            }
        }
        sum / bic.len() as f64
    }

    pub fn bic_deviation(&self) -> [f64; 3] {
        self.row_summary(|i| self.row_bic_avg_deviation(i))
    }

    pub fn row_bic_avg_sorted_quadrants(&self, in_bit_idx: usize) -> [f64; 4] {
        let bic = self.bic_row(in_bit_idx);

        let mut sum = [0u64; 4];
        for mut quadrants in bic.iter().copied() {
            quadrants.sort_unstable();
            for (s, q) in sum.iter_mut().zip(quadrants) {
                *s += q as u64;
            }
        }

        let norm = 1.0 / (bic.len() * self.sample_count) as f64;
        sum.map(|s| s as f64 * norm)
    }

    pub fn avg_bic_sorted_quadrants(&self) -> [f64; 4] {
        let mut sum = [0.0; 4];
        for i in 0..self.input_bit_len {
            for (s, n) in sum.iter_mut().zip(self.row_bic_avg_sorted_quadrants(i)) {
                *s += n;
            }
        }
        sum.map(|s| s / self.input_bit_len as f64)
    }

    pub fn worst_bic_sorted_quadrants(&self) -> [f64; 4] {
        let mut worst = [f64::INFINITY, f64::INFINITY, f64::INFINITY, 0.0];
        for i in 0..self.input_bit_len {
            let n = self.row_bic_avg_sorted_quadrants(i);
            worst[0] = worst[0].min(n[0]);
            worst[1] = worst[1].min(n[1]);
            worst[2] = worst[2].min(n[2]);
            worst[3] = worst[3].max(n[3]);
        }
        worst
    }

    pub fn best_bic_sorted_quadrants(&self) -> [f64; 4] {
        let mut best = [0.0; 4];
        for i in 0..self.input_bit_len {
            let n = self.row_bic_avg_sorted_quadrants(i);
            if n[0] > best[0] {
                best = n;
            }
        }
        best
    }

    pub fn print_report(&self) {
        if !self.avalanche_chart.is_empty() {
            let diffusion = self.input_bit_diffusion();
            let entropy = self.input_bit_entropy();
            println!(
                "    Bias:
        Min: {:0.2}
        Avg: {:0.2}
        Max: {:0.2}
    Input Bit Diffusion (digest size = {} bits):
        Min: {:0.1} bits
        Avg: {:0.1} bits
        Max: {:0.1} bits
    Input Bit Diffusion Entropy (digest size = {} bits):
        Min: {:0.1} bits
        Avg: {:0.1} bits
        Max: {:0.1} bits",
                self.min_bias(),
                self.average_bias(),
                self.max_bias(),
                self.digest_bit_len,
                diffusion[0],
                diffusion[1],
                diffusion[2],
                self.digest_bit_len,
                entropy[0],
                entropy[1],
                entropy[2],
            );
        }

        if !self.bic_chart.is_empty() {
            let [w, a, b] = [
                self.worst_bic_sorted_quadrants(),
                self.avg_bic_sorted_quadrants(),
                self.best_bic_sorted_quadrants(),
            ];
            let deviation = self.bic_deviation();
            println!(
                "    BIC deviation:
        Min: {:0.4}
        Avg: {:0.4}
        Max: {:0.4}",
                deviation[0], deviation[1], deviation[2],
            );
            println!(
                "    BIC quadrants (sorted):
        Wrst: [{:0.4}, {:0.4}, {:0.4}, {:0.4}]
         Avg: [{:0.4}, {:0.4}, {:0.4}, {:0.4}]
        Best: [{:0.4}, {:0.4}, {:0.4}, {:0.4}]",
                w[0], w[1], w[2], w[3], a[0], a[1], a[2], a[3], b[0], b[1], b[2], b[3],
            );
        }
    }

    /// Writes the avalanche chart as a grayscale PNG, one row per input bit.
    /// 50% gray is ideal.
    pub fn write_avalanche_png<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut pixels = Vec::with_capacity(self.avalanche_chart.len() * 4);

        for flips in self.avalanche_chart.iter().copied() {
            let v = (flips as u64 * 255 / self.sample_count.max(1) as u64).min(255) as u8;
            pixels.extend_from_slice(&[v, v, v, 255]);
        }

        let mut file = BufWriter::new(File::create(path.as_ref())?);
        png_encode_mini::write_rgba_from_u8(
            &mut file,
            &pixels,
            self.output_bit_len as u32,
            self.input_bit_len as u32,
        )?;

        info!("Wrote avalanche chart to {}", path.as_ref().display());
        Ok(())
    }
}

/// Computes avalanche and BIC statistics for a given mix function, using a
/// provided input generator.
///
/// - `generate_input`: function that takes a seed and generates an input block.
///   The result should be deterministic based on the seed.  Note that the seed
///   starts from zero, and simply increments each round.
/// - `mix`: function that takes input and mixes it to produce an output. Any
///   data already in the output parameter must be ignored and overwritten.
/// - `input_size`: size of `mix`'s input, in bytes.
/// - `output_size`: size of `mix`'s output, in bytes.
/// - `digest_size`: the digest size of the hash `mix` is a component of, in
///   bytes.  Only used in the report.
/// - `rounds`: how many samples to take.
pub fn compute_stats<F1, F2>(
    generate_input: F1,
    mix: F2,
    input_size: usize,
    output_size: usize,
    digest_size: usize,
    rounds: usize,
    analysis: Analysis,
) -> Stats
where
    F1: Fn(usize, &mut [u8]),
    F2: Fn(&[u8], &mut [u8]),
{
    let mut stats = Stats::new(input_size * 8, output_size * 8, digest_size * 8, analysis);
    let out_bits = output_size * 8;

    let mut input = vec![0u8; input_size];
    let mut output = vec![0u8; output_size];
    let mut input_tweaked = vec![0u8; input_size];
    let mut output_tweaked = vec![0u8; output_size];

    let flipped = |a: &[u8], b: &[u8], bit: usize| -> bool {
        let mask = 1 << (bit % 8);
        (a[bit / 8] & mask) != (b[bit / 8] & mask)
    };

    for round in 0..rounds {
        if round % 4096 == 0 {
            debug!("Round {}/{}", round, rounds);
        }

        generate_input(round, &mut input[..]);
        mix(&input[..], &mut output[..]);

        for in_bit_idx in 0..(input_size * 8) {
            input_tweaked.copy_from_slice(&input[..]);
            input_tweaked[in_bit_idx / 8] ^= 1 << (in_bit_idx % 8);
            mix(&input_tweaked[..], &mut output_tweaked[..]);

            if analysis.avalanche {
                for out_bit_idx in 0..out_bits {
                    let f = flipped(&output[..], &output_tweaked[..], out_bit_idx);
                    stats.accumulate(in_bit_idx, out_bit_idx, f);
                }
            }

            if analysis.bic {
                let stride = out_bits * (out_bits - 1);
                for i in 0..out_bits {
                    let flipped_a = flipped(&output[..], &output_tweaked[..], i);
                    for j in 0..(out_bits - 1) {
                        let i_b = (i + j + 1) % out_bits;
                        let flipped_b = flipped(&output[..], &output_tweaked[..], i_b);

                        let k = (in_bit_idx * stride) + (i * (out_bits - 1)) + j;
                        let quadrant = match (flipped_a, flipped_b) {
                            (true, true) => 0,
                            (false, false) => 1,
                            (true, false) => 2,
                            (false, true) => 3,
                        };
                        stats.bic_chart[k][quadrant] += 1;
                    }
                }
            }
        }

        stats.sample_count += 1;
    }

    info!(
        "Collected {} samples over {} input bits",
        stats.sample_count, stats.input_bit_len
    );

    stats
}

pub fn p_to_bias(p: f64) -> f64 {
    (p * 2.0 - 1.0).abs()
}

pub fn p_to_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        0.0
    } else {
        let q = 1.0 - p;
        -(p * p.log2()) - (q * q.log2())
    }
}

//-------------------------------------------------------------

/// Generates a random byte stream.
pub fn generate_random(seed: usize, bytes: &mut [u8]) {
    let mut rng = WyRand::new_seed(mix64(seed as u64));
    rng.fill_bytes(bytes);
}

/// Generates a byte stream with all zero bits except one.
pub fn generate_single_1_bit(index: usize, bytes: &mut [u8]) {
    let bit_idx = index % (bytes.len() * 8);
    bytes.fill(0);
    bytes[bit_idx / 8] = 1 << (bit_idx % 8);
}

/// Generates a byte stream with roughly `n` random bits set to one.
pub fn generate_n_random_bits(seed: usize, bytes: &mut [u8], n: usize) {
    let mut rng = WyRand::new_seed(mix64(seed as u64 ^ mix64(n as u64)));

    bytes.fill(0);
    for _ in 0..n {
        let bit = rng.generate_range(0..(bytes.len() * 8));
        bytes[bit / 8] |= 1 << (bit % 8);
    }
}

pub fn generate_8_random_bits(seed: usize, bytes: &mut [u8]) {
    generate_n_random_bits(seed, bytes, 8);
}

/// Generates a byte stream with the lowest bits simply counting up as an
/// incrementing integer.
pub fn generate_counting(index: usize, bytes: &mut [u8]) {
    write_low_u64(index as u64, bytes);
}

/// Generates a byte stream with the lowest bits simply iterating through gray
/// codes in order.
pub fn generate_gray_code(index: usize, bytes: &mut [u8]) {
    write_low_u64((index ^ (index >> 1)) as u64, bytes);
}

fn write_low_u64(n: u64, bytes: &mut [u8]) {
    let le = n.to_le_bytes();
    let k = le.len().min(bytes.len());
    bytes[..k].copy_from_slice(&le[..k]);
    bytes[k..].fill(0);
}

/// Generates all combinations of setting zero bits, then one bit, then two
/// bits, and so on, in that order.
pub fn generate_bit_combinations(index: usize, bytes: &mut [u8]) {
    let bit_len = bytes.len() * 8;

    // Compute the number of bits and the sub-index into that subsequence, for the
    // given index.
    let mut n = if bit_len < usize::BITS as usize {
        // Wrap to the total number of combinations if that's less than usize.
        index % (1 << bit_len)
    } else {
        index
    };
    let mut bits = 0;
    let mut combos = binomial(bit_len, bits);
    while n >= combos {
        n -= combos;
        bits += 1;
        combos = binomial(bit_len, bits);
    }

    // Generate the bits for the computed subsequence and sub-index.
    bytes.fill(0);
    let mut t = bit_len;
    while t > 0 && bits > 0 {
        let y = if t > bits { binomial(t - 1, bits) } else { 0 };

        if n >= y {
            bytes[(t - 1) / 8] |= 1 << ((t - 1) % 8);
            n -= y;
            bits -= 1;
        }

        t -= 1;
    }
}

const fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }

    if k == 0 {
        1
    } else if k > (n / 2) {
        binomial(n, n - k)
    } else {
        n * binomial(n - 1, k - 1) / k
    }
}

/// 64-bit bijective bit mixer.
fn mix64(mut n: u64) -> u64 {
    // Break zero sensitivity.
    n ^= 0x7be355f7c2e736d2;

    // http://zimbry.blogspot.ch/2011/09/better-bit-mixing-improving-on.html
    // (variant "Mix13")
    n ^= n >> 30;
    n = n.wrapping_mul(0xbf58476d1ce4e5b9);
    n ^= n >> 27;
    n = n.wrapping_mul(0x94d049bb133111eb);
    n ^= n >> 31;

    n
}
