//! Delve Headless Generation Harness
//!
//! Sweeps seeds and map shapes through the generator and validates the
//! structural invariants of every dungeon. Runs entirely in-process, with no
//! rendering.
//!
//! Usage:
//!   cargo run -p delve-simtest
//!   cargo run -p delve-simtest -- --verbose --seeds 200
//!   cargo run -p delve-simtest -- --config dungeon.json --dump --png out.png
//!   cargo run -p delve-simtest -- --seed random --dump

use delve_logic::generator::{Dungeon, DungeonGenerator, GeneratorConfig};
use delve_logic::grid::Tile;
use delve_logic::render::{save_png, save_ppm, to_text};
use delve_logic::validate::{self, Severity};
use delve_logic::GenError;
use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;

// ── Logging ─────────────────────────────────────────────────────────────

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

// ── Options ─────────────────────────────────────────────────────────────

struct Options {
    verbose: bool,
    seeds: u32,
    config: GeneratorConfig,
    dump: bool,
    ppm: Option<String>,
    png: Option<String>,
    json: bool,
}

/// Value of `--seed`: a number, or `random` for a fresh seed each run.
#[derive(Debug, PartialEq)]
enum SeedChoice {
    Fixed(u32),
    Random,
}

fn parse_seed(v: &str) -> Result<SeedChoice, String> {
    if v == "random" {
        return Ok(SeedChoice::Random);
    }
    v.parse()
        .map(SeedChoice::Fixed)
        .map_err(|e| format!("--seed {}: {}", v, e))
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        verbose: false,
        seeds: 50,
        config: GeneratorConfig::default(),
        dump: false,
        ppm: None,
        png: None,
        json: false,
    };
    let mut seed = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => opts.verbose = true,
            "--dump" => opts.dump = true,
            "--json" => opts.json = true,
            "--seeds" => {
                let v = args.next().ok_or("--seeds needs a value")?;
                opts.seeds = v.parse().map_err(|e| format!("--seeds {}: {}", v, e))?;
            }
            "--seed" => {
                let v = args.next().ok_or("--seed needs a value")?;
                seed = Some(parse_seed(&v)?);
            }
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| format!("reading {}: {}", path, e))?;
                opts.config = serde_json::from_str(&text)
                    .map_err(|e| format!("parsing {}: {}", path, e))?;
            }
            "--ppm" => opts.ppm = Some(args.next().ok_or("--ppm needs a path")?),
            "--png" => opts.png = Some(args.next().ok_or("--png needs a path")?),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    // --seed wins over the seed in --config, whatever the order
    match seed {
        Some(SeedChoice::Fixed(n)) => opts.config.seed = n,
        Some(SeedChoice::Random) => opts.config = opts.config.with_random_seed(),
        None => {}
    }
    Ok(opts)
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let opts = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    // Logger can only fail if one is already installed.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(if opts.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Error
    });

    println!("=== Delve Generation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configured dungeon + optional exports
    results.extend(run_configured(&opts));

    // 2. Seed sweep over several shapes
    results.extend(validate_seed_sweep(&opts));

    // 3. Determinism
    results.extend(validate_determinism(&opts));

    // 4. Edge scenarios
    results.extend(validate_scenarios());

    // 5. Error taxonomy
    results.extend(validate_errors());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Configured dungeon ───────────────────────────────────────────────

#[derive(Serialize)]
struct DungeonSummary<'a> {
    config: &'a GeneratorConfig,
    leaves: usize,
    rooms: usize,
    corridors: usize,
    degenerate_leaves: usize,
    floor_tiles: usize,
    tree_depth: usize,
}

fn run_configured(opts: &Options) -> Vec<TestResult> {
    println!("--- Configured Dungeon ---");
    let mut results = Vec::new();
    let config = &opts.config;

    let dungeon = match Dungeon::generate(config) {
        Ok(d) => d,
        Err(e) => {
            results.push(TestResult {
                name: "configured_generate".into(),
                passed: false,
                detail: format!("{:?}: {}", config, e),
            });
            return results;
        }
    };

    let issues = validate::validate_all(&dungeon);
    let errors = validate::errors_only(&issues);
    results.push(TestResult {
        name: "configured_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            format!(
                "{}x{} seed {}: {} rooms, {} warnings",
                config.width,
                config.height,
                config.seed,
                dungeon.rooms().len(),
                issues.len()
            )
        } else {
            errors
                .iter()
                .map(|e| format!("[{}] {}", e.category, e.message))
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    if opts.dump {
        print!("{}", to_text(dungeon.grid()));
    }

    if opts.json {
        let summary = DungeonSummary {
            config,
            leaves: dungeon.tree().leaf_count(),
            rooms: dungeon.rooms().len(),
            corridors: dungeon.corridors().len(),
            degenerate_leaves: dungeon.degenerate_leaves().len(),
            floor_tiles: dungeon.grid().count(Tile::Floor),
            tree_depth: dungeon.tree().depth(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize summary: {}", e),
        }
    }

    if let Some(path) = &opts.ppm {
        let res = save_ppm(dungeon.grid(), path);
        results.push(TestResult {
            name: "export_ppm".into(),
            passed: res.is_ok(),
            detail: match res {
                Ok(()) => format!("wrote {}", path),
                Err(e) => format!("{}: {}", path, e),
            },
        });
    }

    if let Some(path) = &opts.png {
        let res = save_png(dungeon.grid(), path);
        results.push(TestResult {
            name: "export_png".into(),
            passed: res.is_ok(),
            detail: match res {
                Ok(()) => format!("wrote {}", path),
                Err(e) => format!("{}: {}", path, e),
            },
        });
    }

    results
}

// ── 2. Seed sweep ───────────────────────────────────────────────────────

const SHAPES: &[(i32, i32, i32, i32)] = &[
    (64, 48, 8, 20),
    (100, 40, 6, 14),
    (40, 100, 6, 14),
    (160, 120, 10, 30),
    (30, 30, 5, 5),
    (60, 60, 3, 8),
];

fn validate_seed_sweep(opts: &Options) -> Vec<TestResult> {
    println!("--- Seed Sweep ---");
    let mut results = Vec::new();

    for &(w, h, min_leaf, max_leaf) in SHAPES {
        let mut failures = Vec::new();
        let mut warnings = 0;
        let mut rooms = 0;
        for seed in 0..opts.seeds {
            let config = GeneratorConfig::new(w, h, min_leaf, max_leaf, seed);
            match Dungeon::generate(&config) {
                Ok(d) => {
                    rooms += d.rooms().len();
                    for issue in validate::validate_all(&d) {
                        match issue.severity {
                            Severity::Error => failures.push(format!(
                                "seed {} [{}] {}",
                                seed, issue.category, issue.message
                            )),
                            Severity::Warning => warnings += 1,
                        }
                    }
                }
                Err(e) => failures.push(format!("seed {}: {}", seed, e)),
            }
        }

        let name = format!("sweep_{}x{}_leaf_{}_{}", w, h, min_leaf, max_leaf);
        if opts.verbose {
            println!(
                "  {}: {} seeds, avg {:.1} rooms, {} warnings",
                name,
                opts.seeds,
                rooms as f32 / opts.seeds.max(1) as f32,
                warnings
            );
        }
        results.push(TestResult {
            name,
            passed: failures.is_empty(),
            detail: if failures.is_empty() {
                format!("{} seeds clean ({} warnings)", opts.seeds, warnings)
            } else {
                format!("{} failures, first: {}", failures.len(), failures[0])
            },
        });
    }
    results
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(opts: &Options) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let mut mismatches = 0;
    for seed in 0..opts.seeds.min(20) {
        let config = GeneratorConfig {
            seed,
            ..opts.config.clone()
        };
        let (Ok(a), Ok(b)) = (Dungeon::generate(&config), Dungeon::generate(&config)) else {
            mismatches += 1;
            continue;
        };
        if a.grid() != b.grid() {
            mismatches += 1;
        }
    }
    results.push(TestResult {
        name: "same_seed_same_grid".into(),
        passed: mismatches == 0,
        detail: format!("{} mismatching seeds", mismatches),
    });

    let mut gen = DungeonGenerator::new();
    let mut reused_ok = true;
    for seed in [5, 6, 5] {
        let mut config = opts.config.clone();
        config.seed = seed;
        let fresh = Dungeon::generate(&config).map(Dungeon::into_grid);
        let reused = gen
            .generate_with(&config)
            .map(|()| gen.dungeon().map(|d| d.grid().clone()));
        reused_ok &= matches!((fresh, reused), (Ok(f), Ok(Some(r))) if f == r);
    }
    results.push(TestResult {
        name: "reused_generator_matches_fresh".into(),
        passed: reused_ok,
        detail: "regenerating on one instance discards prior state".into(),
    });

    results
}

// ── 4. Scenarios ────────────────────────────────────────────────────────

fn validate_scenarios() -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    // Root too small to split: one leaf, one room, solid border
    let single = Dungeon::generate(&GeneratorConfig::new(6, 6, 4, 4, 1));
    let single_ok = match &single {
        Ok(d) => {
            let rooms = d.rooms();
            let border_wall = (0..6).all(|i| {
                [(i, 0), (i, 5), (0, i), (5, i)]
                    .iter()
                    .all(|&(x, y)| d.get_tile(x, y) == Ok(Tile::Wall))
            });
            d.tree().len() == 1
                && rooms.len() == 1
                && (3..=4).contains(&rooms[0].w)
                && (3..=4).contains(&rooms[0].h)
                && border_wall
        }
        Err(_) => false,
    };
    results.push(TestResult {
        name: "single_leaf_6x6".into(),
        passed: single_ok,
        detail: "6x6 with min_leaf 4 keeps one room inside a wall border".into(),
    });

    // Enough room along the long axis to split at least once
    let split = Dungeon::generate(&GeneratorConfig::new(20, 12, 5, 8, 1));
    let leaves = split.as_ref().map_or(0, |d| d.tree().leaf_count());
    results.push(TestResult {
        name: "split_20x12".into(),
        passed: leaves >= 2,
        detail: format!("{} leaves", leaves),
    });

    results
}

// ── 5. Errors ───────────────────────────────────────────────────────────

fn validate_errors() -> Vec<TestResult> {
    println!("--- Errors ---");
    let mut results = Vec::new();

    let bad = [
        GeneratorConfig::new(0, 10, 4, 8, 0),
        GeneratorConfig::new(10, 10, -2, 8, 0),
        GeneratorConfig::new(10, 10, 9, 8, 0),
    ];
    let all_rejected = bad.iter().all(|c| {
        matches!(
            Dungeon::generate(c),
            Err(GenError::InvalidDimension { .. })
        )
    });
    results.push(TestResult {
        name: "invalid_dimension".into(),
        passed: all_rejected,
        detail: format!("{} bad configs rejected", bad.len()),
    });

    let gen = DungeonGenerator::new();
    results.push(TestResult {
        name: "uninitialized_out_of_bounds".into(),
        passed: matches!(gen.get_tile(0, 0), Err(GenError::IndexOutOfBounds { .. })),
        detail: "get_tile before generate".into(),
    });

    let tiny = Dungeon::generate(&GeneratorConfig::new(4, 4, 2, 2, 0));
    results.push(TestResult {
        name: "degenerate_leaf_recovered".into(),
        passed: matches!(&tiny, Ok(d) if d.degenerate_leaves().len() == 1),
        detail: "4x4 map leaves one wall-only leaf".into(),
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_argument_forms() {
        assert_eq!(parse_seed("42"), Ok(SeedChoice::Fixed(42)));
        assert_eq!(parse_seed("random"), Ok(SeedChoice::Random));
        assert!(parse_seed("-1").is_err());
        assert!(parse_seed("Random").is_err());
    }
}
