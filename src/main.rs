//! Fermented Tofu Master entry point
//!
//! The browser build is driven from JavaScript through `platform::web`.
//! Natively this plays a scripted demo run and records it in a local
//! leaderboard.
//!
//! Usage: `meidoufu [easy|normal|hard] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use meidoufu::persistence::FileStore;
    use meidoufu::platform::{NoMotion, NullFeedback};
    use meidoufu::sim::{Autoplay, AutoplayPlan, Game};
    use meidoufu::{Difficulty, Settings};

    env_logger::init();
    log::info!("Fermented Tofu Master (native demo) starting...");

    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let data_dir = std::env::var("MEIDOUFU_DATA").unwrap_or_else(|_| "meidoufu-data".to_string());
    let mut game = Game::new(FileStore::new(&data_dir), NullFeedback, NoMotion, seed);

    let settings = Settings {
        difficulty,
        ..game.settings().clone()
    };
    if let Err(e) = game.set_settings(settings) {
        log::warn!("Could not save settings: {e}");
    }

    let summary = match Autoplay::new(AutoplayPlan::random(seed)).play(&mut game) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("Demo run failed: {e}");
            std::process::exit(1);
        }
    };

    let score = game.score();
    println!("Difficulty:  {}", difficulty.as_str());
    println!("Integrity:   {:.0}", score.integrity);
    println!("Spirit:      {:.0}", score.alcohol_precision);
    println!("Seasoning:   {:.0} ({})", score.flavor_balance, score.flavor_title);
    println!("Bottling:    {:.0}", score.bottling_score);
    println!(
        "Final:       {} - {} {}",
        summary.score,
        summary.rating.label(),
        "*".repeat(summary.rating.stars() as usize)
    );

    match game.save_result("Autoplay") {
        Ok(Some(rank)) => println!("Leaderboard: #{rank} (saved in {data_dir})"),
        Ok(None) => println!("Leaderboard: did not place"),
        Err(e) => log::warn!("Could not save result: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is `platform::web::init`
}
