//! wallet-loadtest - CLI entry point.
//!
//! Phases:
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌────────────┐    ┌──────────┐
//! │  Build   │───▶│   Settle   │───▶│  Dispatch  │───▶│  Verify  │
//! │ wallets  │    │   (wait)   │    │ operations │    │  ledger  │
//! └──────────┘    └────────────┘    └────────────┘    └──────────┘
//! ```
//!
//! Exit codes: 0 on completion (per-item failures included), 1 on an empty
//! population or unexpected fault, 130 on Ctrl-C.

use std::process;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use wallet_loadtest::harness::{
    ConcurrencyDispatcher, ConsistencyVerifier, HarnessError, OperationPolicy, StatsAggregator,
    VerificationSample, WalletPopulationBuilder,
};
use wallet_loadtest::{AppConfig, CaptureSink, HttpWalletClient, WalletApi};

// ============================================================
// ARGUMENT SCANNING
// ============================================================

fn get_arg_value(name: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == name && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn get_usize_arg(name: &str, default: usize) -> usize {
    get_arg_value(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn has_flag(name: &str) -> bool {
    std::env::args().any(|a| a == name)
}

struct CliArgs {
    wallets: usize,
    operations: usize,
    fast: bool,
    workers: usize,
    env: String,
    base_url: Option<String>,
    seed: Option<u64>,
}

fn parse_args() -> CliArgs {
    CliArgs {
        wallets: get_usize_arg("--wallets", 100),
        operations: get_usize_arg("--operations", 200),
        fast: has_flag("--fast"),
        workers: get_usize_arg("--workers", 10),
        env: get_arg_value("--env").unwrap_or_else(|| "dev".to_string()),
        base_url: get_arg_value("--base-url"),
        seed: get_arg_value("--seed").and_then(|v| v.parse().ok()),
    }
}

// ============================================================
// MAIN
// ============================================================

#[tokio::main]
async fn main() {
    let args = parse_args();
    let mut config = AppConfig::load(&args.env);
    if let Some(base_url) = &args.base_url {
        config.api.base_url = base_url.clone();
    }
    let _log_guard = wallet_loadtest::logging::init_logging(&config.log);

    println!("{}", "=".repeat(70));
    println!("🚀 Wallet Load Test");
    println!("{}", "=".repeat(70));
    println!("\n⚙️  Configuration:");
    println!("   API URL: {}", config.api.base_url);
    println!("   Wallets: {}", args.wallets);
    println!("   Operations: {}", args.operations);
    println!(
        "   Mode: {}",
        if args.fast { "Parallel" } else { "Sequential" }
    );
    if args.fast {
        println!("   Workers: {}", args.workers);
    }
    println!();

    // Ctrl-C terminates immediately; nothing accumulated so far is flushed.
    let result = tokio::select! {
        result = run(&args, &config) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n⚠️  Test interrupted by user");
            process::exit(130);
        }
    };

    match result {
        Ok(()) => {
            println!("{}", "=".repeat(70));
            println!("✅ Load test complete!");
            println!("{}", "=".repeat(70));
        }
        Err(HarnessError::EmptyPopulation) => {
            eprintln!("❌ No wallets created. Exiting...");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Unexpected error: {}", e);
            process::exit(1);
        }
    }
}

async fn run(args: &CliArgs, config: &AppConfig) -> Result<(), HarnessError> {
    let client = HttpWalletClient::new(&config.api)?;
    let api: &dyn WalletApi = &client;

    let policy = OperationPolicy::new(config.policy.clone());
    let stats = StatsAggregator::new();
    let capture = CaptureSink::new(&config.run.capture_dir);
    let pacing = Duration::from_millis(config.run.pacing_ms);
    let settle = Duration::from_secs(config.run.settle_secs);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let parallelism = if args.fast { args.workers.max(1) } else { 1 };

    // Step 1: create wallets
    println!("📝 Creating {} wallets...", args.wallets);
    let create_start = Instant::now();
    let builder = WalletPopulationBuilder::new(api, &policy, &stats, &capture, pacing);
    let population = builder.build(args.wallets, parallelism, &mut rng).await?;
    let create_duration = create_start.elapsed();
    println!(
        "✅ Created {} wallets in {:.2}s\n",
        population.len(),
        create_duration.as_secs_f64()
    );

    // Step 2: let the projection catch up before mixing in operations
    println!(
        "⏳ Waiting {}s for async processing...\n",
        settle.as_secs()
    );
    tokio::time::sleep(settle).await;

    // Step 3: randomized operations
    println!("🎲 Performing {} random operations...", args.operations);
    let ops_start = Instant::now();
    let dispatcher = ConcurrencyDispatcher::new(api, &policy, &stats, &capture, pacing);
    dispatcher
        .run(args.operations, &population, parallelism, &mut rng)
        .await;
    let ops_duration = ops_start.elapsed();
    println!(
        "✅ Completed operations in {:.2}s\n",
        ops_duration.as_secs_f64()
    );

    // Step 4: sample the ledger projection
    println!("🔍 Checking ledger entries (sample)...");
    let verifier = ConsistencyVerifier::new(api);
    let samples = verifier
        .verify(&population, config.run.sample_size, settle, &mut rng)
        .await;
    print_verification(&samples);

    print_summary(&stats, create_duration, ops_duration);
    Ok(())
}

// ============================================================
// REPORTING
// ============================================================

fn print_verification(samples: &[VerificationSample]) {
    for sample in samples {
        match sample.entry_count {
            Some(count) => println!("   {}: {} entries", sample.wallet_id, count),
            None => println!(
                "   {}: ❌ {}",
                sample.wallet_id,
                sample.error.as_deref().unwrap_or("query failed")
            ),
        }
    }
    println!();
}

fn print_summary(stats: &StatsAggregator, create_duration: Duration, ops_duration: Duration) {
    let snap = stats.snapshot();

    println!("{}", "=".repeat(70));
    println!("📊 Final Statistics");
    println!("{}", "=".repeat(70));
    println!("\n💼 Wallets:");
    println!("   ✅ Success: {}", snap.wallets_success);
    println!("   ❌ Failed:  {}", snap.wallets_failed);
    println!("\n💰 Operations:");
    println!(
        "   Credit:   {} ✓ / {} ✗",
        snap.credit_success, snap.credit_failed
    );
    println!(
        "   Debit:    {} ✓ / {} ✗",
        snap.debit_success, snap.debit_failed
    );
    println!(
        "   Transfer: {} ✓ / {} ✗",
        snap.transfer_success, snap.transfer_failed
    );
    println!(
        "\n   Total: {} ✓ / {} ✗",
        snap.operations_success(),
        snap.operations_failed()
    );

    let total = create_duration + ops_duration;
    println!("\n⏱️  Total Duration: {:.2}s", total.as_secs_f64());
    if ops_duration.as_secs_f64() > 0.0 {
        println!(
            "   Operations/sec: {:.2}",
            snap.operations_success() as f64 / ops_duration.as_secs_f64()
        );
    }
    println!();
}
