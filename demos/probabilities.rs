use chrono::NaiveDate;
use climate_odds::{
    AdviceContext, AdviceGenerator, ClimateEngine, Dimensions, HeuristicAdvisor, LatLon, MonthDay,
    RainCategory,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let brasilia = LatLon(-15.79, -47.88);
    let engine = ClimateEngine::new();

    let outcome = engine
        .odds()
        .location(brasilia)
        .month_day(MonthDay::new(10, 20)?)
        .range_years(10)
        .dimensions(Dimensions::ALL)
        .include_solar(true)
        .call()
        .await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let Some(report) = outcome.report() {
        if let Some(rain) = &report.conditions.rain {
            println!(
                "Rainy in {}% of {} sampled years",
                rain.percentage(RainCategory::Rainy),
                rain.total
            );
        }
        if let Some(afternoon) = report.hour(15) {
            dbg!(afternoon);
        }
    }

    let context = AdviceContext {
        lat: brasilia.0,
        lon: brasilia.1,
        date: NaiveDate::from_ymd_opt(2026, 10, 20).ok_or("invalid date")?,
    };
    let advice = HeuristicAdvisor
        .advise(&outcome, &context, Some("Is it a good day for a picnic?"))
        .await;
    println!("{}", serde_json::to_string_pretty(&advice)?);

    Ok(())
}
