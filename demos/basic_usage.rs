// ============================================================================
// Basic Usage Example
// ============================================================================

use ledger_amount::prelude::*;

const ISSUER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

fn main() {
    #[cfg(feature = "logging")]
    ledger_amount::utils::init_logging("ledger_amount=debug").unwrap();

    println!("=== Ledger Amount Example ===\n");

    // Native amounts are held in drops
    let fee = Amount::parse("0.00001 STR");
    let balance = Amount::parse("25/STR");
    println!("Fee: {} ({} drops)", fee, fee.drops().unwrap());
    println!("Balance after fee: {}", balance.subtract(&fee).unwrap());

    // Issued amounts carry a currency and an issuer
    println!("\n=== Issued Amounts ===");
    let price = Amount::parse(&format!("0.25/USD/{ISSUER}"));
    let quantity = Amount::from_human("1200 STR", &HumanParseOptions::default());
    let cost = price.product_human(&quantity, &ArithmeticOptions::new()).unwrap();
    println!("{} x {} = {}", price.to_human(&HumanFormat::plain()), quantity, cost);
    println!("As JSON: {}", cost.to_json());

    // Interest-bearing currencies
    println!("\n=== Demurrage ===");
    let gold = Currency::parse("XAU (-0.5%pa)");
    let holding = Amount::issued(
        IssuedValue::parse("100").unwrap(),
        gold,
        UInt160::parse_account(ISSUER),
    );
    for years in 1..=3 {
        let time = LedgerTime::from_ledger_seconds(years * 31_536_000);
        let value = holding.apply_interest(time).unwrap();
        println!(
            "After {} year(s): {} ({}%)",
            years,
            value.to_human(&HumanFormat::display()),
            gold.interest_percentage_at(time, Some(4))
        );
    }

    // Order-book qualities
    println!("\n=== Quality ===");
    let options = QualityOptions::new().with_base_currency(Currency::native());
    let rate = Amount::from_quality(
        "5511C37937E08000",
        Currency::from_iso("USD"),
        UInt160::parse_account(ISSUER),
        &options,
    );
    println!("USD per STR: {}", rate.to_human(&HumanFormat::display()));
    println!("Inverted: {}", rate.invert().unwrap().to_text());

    // Comparison reports why two amounts differ
    println!("\n=== Comparison ===");
    let euro = price.with_currency(Currency::from_iso("EUR"));
    match price.not_equals_why(&euro, false) {
        Some(reason) => println!("Not equal: {}", reason),
        None => println!("Equal"),
    }

    println!("\nExample completed successfully!");
}
