#![allow(missing_docs, clippy::unwrap_used)]
use chrono::{NaiveDate, TimeZone};
use chrono_tz::US::Eastern;
use sun_moon::{AstronomicalCalculator, EventName, Location, NameFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Ithaca, NY coordinates
    let ithaca = Location::new(42.431964, -76.501656)?;
    let date = NaiveDate::from_ymd_opt(2020, 10, 1).ok_or("Invalid date")?;
    let config = sun_moon::CalculatorConfig::default().with_result_times_local(true);
    let mut calculator = AstronomicalCalculator::with_config(config)?;

    println!("Sun and Moon - Ithaca, NY");
    println!("Location: {:.5}°N, {:.5}°W", ithaca.latitude(), ithaca.longitude().abs());
    println!("Date: {}", date.format("%B %d, %Y"));
    println!("{:=<60}", "");

    println!("Solar day:");
    for event in calculator.get_solar_events(&ithaca, Eastern, date, &NameFilter::All, true)? {
        println!("  {:<18} {}", event.name, event.time.format("%H:%M:%S %Z"));
    }
    println!();

    println!("Solar night:");
    for event in calculator.get_solar_events(&ithaca, Eastern, date, &NameFilter::All, false)? {
        println!("  {:<18} {}", event.name, event.time.format("%b %d %H:%M:%S %Z"));
    }
    println!();

    if let Some(sunrise) = calculator.get_solar_event_time(&ithaca, Eastern, date, EventName::Sunrise, true)? {
        let position = calculator.get_solar_position(&ithaca, Eastern, &sunrise);
        println!("Sun at sunrise: altitude {:.2}°, azimuth {:.2}°", position.altitude, position.azimuth);
    }
    println!();

    println!("Hourly:");
    for hour in (0..24).step_by(2) {
        let at = Eastern.with_ymd_and_hms(2020, 10, 1, hour, 0, 0).unwrap();
        let period = calculator.get_solar_period_name(&ithaca, Eastern, &at)?;
        let sun = calculator.get_solar_position(&ithaca, Eastern, &at);
        let moon = calculator.get_lunar_position(&ithaca, Eastern, &at);
        let illumination = calculator.get_lunar_illumination(&ithaca, Eastern, &at);
        let solar_date = calculator.get_solar_date(&ithaca, Eastern, &at, true)?;
        println!(
            "  {:02}:00  {:<30} sun {:>6.2}°  moon {:>6.2}° ({:>3.0}% lit)  solar date {}",
            hour,
            period,
            sun.altitude,
            moon.altitude,
            illumination * 100.0,
            solar_date
        );
    }

    Ok(())
}
