//! `ecostore tier` - loyalty tier lookup.

use ecostore_core::TierProgress;

fn render(points: u64) -> String {
    let progress = TierProgress::for_points(points);
    match progress.next_tier {
        Some(next) => format!(
            "{} points: {} ({}% of the way, {} more for {})",
            progress.points,
            progress.tier,
            progress.progress_percent,
            progress.points_to_next,
            next
        ),
        None => format!("{} points: {} (top tier)", progress.points, progress.tier),
    }
}

#[allow(clippy::print_stdout)]
pub fn print(points: u64) {
    println!("{}", render(points));
}
