use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use jenkins_hash::{
    init_env_logger,
    mixers::{hash_block, hash_tail, hash_two_blocks, lookup3_final, lookup3_mix},
    stats::{
        compute_stats, generate_8_random_bits, generate_bit_combinations, generate_counting,
        generate_gray_code, generate_random, generate_single_1_bit, Analysis,
    },
};

#[derive(Parser, Debug)]
#[command(about = "Measures avalanche and bit independence of the hash's mixing stages.", long_about = None)]
struct Args {
    /// Only run mixers whose name contains one of these (case-insensitive).
    filters: Vec<String>,
    /// Also compute the bit independence criterion (slow).
    #[arg(long, default_value_t = false)]
    bic: bool,
    /// Skip the avalanche chart.
    #[arg(long, default_value_t = false)]
    no_avalanche: bool,
    /// Override the number of rounds for every pattern except "single-bit".
    #[arg(short, long)]
    rounds: Option<usize>,
    /// Write an avalanche PNG per mixer and pattern into this directory.
    #[arg(long)]
    png_dir: Option<PathBuf>,
    /// List the mixers and patterns, then exit.
    #[arg(short, long, default_value_t = false)]
    list: bool,
}

struct Mixer<'a> {
    name: &'a str,
    mix_function: &'a dyn Fn(&[u8], &mut [u8]),
    input_size: usize,  // In bytes.
    output_size: usize, // In bytes.
    digest_size: usize, // In bytes.
}

const MIXERS: &[Mixer] = &[
    Mixer {
        name: "lookup3 mix round, 1 block",
        mix_function: &lookup3_mix::mix_input,
        input_size: lookup3_mix::IN_SIZE_BYTES,
        output_size: lookup3_mix::OUT_SIZE_BYTES,
        digest_size: lookup3_mix::DIGEST_SIZE_BYTES,
    },
    Mixer {
        name: "lookup3 final round",
        mix_function: &lookup3_final::mix_input,
        input_size: lookup3_final::IN_SIZE_BYTES,
        output_size: lookup3_final::OUT_SIZE_BYTES,
        digest_size: lookup3_final::DIGEST_SIZE_BYTES,
    },
    Mixer {
        name: "hash_bytes, 11-byte tail",
        mix_function: &hash_tail::mix_input,
        input_size: hash_tail::IN_SIZE_BYTES,
        output_size: hash_tail::OUT_SIZE_BYTES,
        digest_size: hash_tail::DIGEST_SIZE_BYTES,
    },
    Mixer {
        name: "hash_bytes, 12-byte block",
        mix_function: &hash_block::mix_input,
        input_size: hash_block::IN_SIZE_BYTES,
        output_size: hash_block::OUT_SIZE_BYTES,
        digest_size: hash_block::DIGEST_SIZE_BYTES,
    },
    Mixer {
        name: "hash_bytes, 24 bytes",
        mix_function: &hash_two_blocks::mix_input,
        input_size: hash_two_blocks::IN_SIZE_BYTES,
        output_size: hash_two_blocks::OUT_SIZE_BYTES,
        digest_size: hash_two_blocks::DIGEST_SIZE_BYTES,
    },
];

struct BitPattern<'a> {
    name: &'a str,
    gen_function: &'a dyn Fn(usize, &mut [u8]),

    /// Number of rounds to run the pattern with. Zero is treated specially, and
    /// means to use the bit width of the input.
    rounds: usize,
}

const PATTERNS: &[BitPattern] = &[
    BitPattern {
        name: "random",
        gen_function: &generate_random,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "counting",
        gen_function: &generate_counting,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "gray code",
        gen_function: &generate_gray_code,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "bit combinations",
        gen_function: &generate_bit_combinations,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "8 random bits",
        gen_function: &generate_8_random_bits,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "single-bit",
        gen_function: &generate_single_1_bit,

        // NOTE: because this test has a small, fixed number of rounds by its
        // nature, even a very good mixing function is unlikely to look
        // "perfect" here: there aren't enough samples to reduce variance.
        rounds: 0,
    },
];

fn main() -> Result<()> {
    init_env_logger()?;

    let args = Args::parse();

    if args.list {
        for mixer in MIXERS {
            println!(
                "{} ({} -> {} bits)",
                mixer.name,
                mixer.input_size * 8,
                mixer.output_size * 8
            );
        }
        for pattern in PATTERNS {
            println!("pattern: {}", pattern.name);
        }
        return Ok(());
    }

    let analysis = Analysis {
        avalanche: !args.no_avalanche,
        bic: args.bic,
    };
    if !analysis.avalanche && !analysis.bic {
        anyhow::bail!("nothing to compute: --no-avalanche without --bic");
    }

    if let Some(dir) = &args.png_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create {}", dir.display()))?;
    }

    let filters: Vec<String> = args.filters.iter().map(|f| f.to_lowercase()).collect();

    for mixer in MIXERS {
        let lower_name = mixer.name.to_lowercase();
        if !filters.is_empty() && !filters.iter().any(|f| lower_name.contains(f)) {
            continue;
        }

        println!("\n================================");
        println!("{}", mixer.name);
        for pattern in PATTERNS {
            let rounds = match (pattern.rounds, args.rounds) {
                (0, _) => mixer.input_size * 8,
                (_, Some(r)) => r,
                (r, None) => r,
            };
            info!("{}: {} rounds of {}", mixer.name, rounds, pattern.name);

            println!("\nInput bit pattern: {}", pattern.name);
            let stats = compute_stats(
                pattern.gen_function,
                mixer.mix_function,
                mixer.input_size,
                mixer.output_size,
                mixer.digest_size,
                rounds,
                analysis,
            );
            stats.print_report();

            if let (Some(dir), true) = (&args.png_dir, analysis.avalanche) {
                let path = dir.join(format!("{} - {}.png", mixer.name, pattern.name));
                stats
                    .write_avalanche_png(&path)
                    .with_context(|| format!("Could not write {}", path.display()))?;
            }
        }
    }

    Ok(())
}
