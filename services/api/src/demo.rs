use crate::infra::{InMemoryListingStore, InMemoryVisitBook, LoggingInterestPublisher};
use arriendo::assistant::{ChatAssistant, RuleBasedAssistant};
use arriendo::billing::{first_payment_quote, format};
use arriendo::config::AppConfig;
use arriendo::error::AppError;
use arriendo::listings::{import_portfolio, ListingService};
use arriendo::scheduling::visit_slots;
use arriendo::visits::{VisitDesk, VisitRequest};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct SlotsArgs {
    /// Visit date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: NaiveDate,
}

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Lease start date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start_date: NaiveDate,
    /// Monthly rent in CLP
    #[arg(long)]
    pub(crate) monthly_rent: f64,
    /// Security deposit in months of rent (defaults to the configured value)
    #[arg(long)]
    pub(crate) deposit_months: Option<u32>,
}

/// Explicit flag wins; otherwise the market-wide default from the
/// environment applies, as on the HTTP quote path.
fn resolve_deposit_months(flag: Option<u32>) -> Result<u32, AppError> {
    match flag {
        Some(months) => Ok(months),
        None => Ok(AppConfig::load()?.billing.deposit_months),
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for visit booking (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_slots(args: SlotsArgs) -> Result<(), AppError> {
    let slots = visit_slots(args.date);
    if slots.is_empty() {
        println!("No visit slots on {} (Sundays are closed)", args.date);
        return Ok(());
    }

    println!("Visit slots for {}", args.date);
    for slot in slots {
        println!("  - {}", slot.label());
    }
    Ok(())
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let deposit_months = resolve_deposit_months(args.deposit_months)?;
    let Some(quote) = first_payment_quote(args.start_date, args.monthly_rent, deposit_months)
    else {
        println!("Monthly rent must be a positive amount");
        return Ok(());
    };

    println!("First payment for a lease starting {}", args.start_date);
    if quote.is_prorated {
        println!(
            "  Prorated days: {} -> {}",
            quote.prorated_days,
            format::clp(quote.prorated_amount)
        );
    } else {
        println!("  No proration (lease starts on the 1st)");
    }
    println!(
        "  First full month ({}): {}",
        format::month_label(quote.first_full_month),
        format::clp(quote.first_full_month_rent)
    );
    println!(
        "  Security deposit ({} month(s)): {}",
        deposit_months,
        format::clp(quote.security_deposit)
    );
    println!("  Total first payment: {}", format::clp(quote.total_first_payment));
    println!("Upcoming months:");
    for charge in &quote.upcoming {
        println!(
            "  - {}: {}",
            format::month_label(charge.month),
            format::clp(charge.amount)
        );
    }
    Ok(())
}

const DEMO_PORTFOLIO: &str = "\
Building,Unit,Bedrooms,Bathrooms,Monthly Rent,Description,Photo Folder
Edificio Mirador,801,1,1,350000,Piso alto con vista despejada,
Edificio Mirador,1204,2,1,450000,Esquina norte con terraza,
Edificio Mirador,1205,2,1,480000,Remodelado 2023,
Torre Central,302,2,2,520000,Frente al parque,
";

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    println!("Rental marketplace demo");

    let store = Arc::new(InMemoryListingStore::default());
    let interest = Arc::new(LoggingInterestPublisher::default());
    let catalog = Arc::new(ListingService::new(store, interest));

    println!("\nImporting landlord portfolio");
    let drafts = import_portfolio(DEMO_PORTFOLIO.as_bytes())?;
    for draft in drafts {
        let listing = catalog.publish("landlord-demo", draft)?;
        println!(
            "  - {} {} ({}) -> {}",
            listing.building,
            listing.unit,
            listing.typology.label(),
            format::clp(listing.monthly_rent)
        );
    }

    println!("\nBrowse view (building / typology groups)");
    for group in catalog.browse()? {
        println!(
            "  - {} {}: {} unit(s), {} - {}",
            group.building,
            group.typology_label,
            group.listings.len(),
            format::clp(group.lowest_rent),
            format::clp(group.highest_rent)
        );
    }

    println!("\nAssistant conversation");
    let assistant = RuleBasedAssistant::new(catalog.clone());
    let message = "busco un 2D hasta $500.000";
    let reply = match assistant.reply(message) {
        Ok(reply) => reply,
        Err(err) => {
            println!("  Assistant unavailable: {err}");
            return Ok(());
        }
    };
    println!("  tenant: {message}");
    println!("  assistant: {}", reply.response);
    for listing in &reply.recommendations {
        println!(
            "    recommended {} {} -> {}",
            listing.building,
            listing.unit,
            format::clp(listing.monthly_rent)
        );
    }

    println!("\nBooking a visit");
    let desk = VisitDesk::new(Arc::new(InMemoryVisitBook::default()));
    let recommended = match reply.recommendations.first() {
        Some(listing) => listing,
        None => {
            println!("  Nothing to visit");
            return Ok(());
        }
    };

    // Walk forward to the next day with slots (skips Sundays).
    let mut visit_date = today;
    let mut slots = visit_slots(visit_date);
    while slots.is_empty() {
        visit_date = visit_date.succ_opt().expect("calendar does not end");
        slots = visit_slots(visit_date);
    }
    let slot = slots[0];

    let recorded = desk.request(
        VisitRequest {
            listing_id: recommended.id.clone(),
            tenant_name: "Carla Rojas".to_string(),
            tenant_email: "carla@example.com".to_string(),
            date: visit_date,
            slot,
        },
        today,
    )?;
    println!(
        "  Confirmed {} {} on {} at {}",
        recommended.building,
        recommended.unit,
        recorded.date,
        recorded.slot.label()
    );

    println!("\nFirst payment preview");
    run_quote(QuoteArgs {
        start_date: visit_date,
        monthly_rent: recommended.monthly_rent,
        deposit_months: Some(1),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn deposit_flag_overrides_the_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::set_var("ARRIENDO_DEPOSIT_MONTHS", "2");
        let months = resolve_deposit_months(Some(5)).expect("flag resolves");
        env::remove_var("ARRIENDO_DEPOSIT_MONTHS");
        assert_eq!(months, 5);
    }

    #[test]
    fn missing_deposit_flag_falls_back_to_the_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::set_var("ARRIENDO_DEPOSIT_MONTHS", "2");
        let months = resolve_deposit_months(None).expect("config resolves");
        env::remove_var("ARRIENDO_DEPOSIT_MONTHS");
        assert_eq!(months, 2);
    }
}
