use colored::*;
use local_election::formats::election_file::ElectionFile;
use local_election::model::seats::number_of_districts_by_law;
use local_election::model::DistrictKind;
use std::path::Path;

/// Validate an election file and dump its districts, seats and nominations.
pub fn info(election_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let election = ElectionFile::read(election_file)?.into_election()?;
    let districts = election.districts();
    let root = districts.root();

    println!(
        "🗳️  {} ({})",
        election.name().bright_cyan().bold(),
        election.date().format("%Y-%m-%d")
    );
    println!("   Area: {} {}", districts.area_type(), root.name().bright_cyan());

    match election.population(root.id()) {
        Some(population) => {
            let counts = election.seat_counts()?;
            println!("   Population: {}", population.to_string().bright_yellow());
            println!(
                "   Seats: {} ({} direct, {} list)",
                counts.total_seats.to_string().bright_green().bold(),
                counts.direct_seats,
                counts.list_seats
            );
            println!(
                "   Sub-districts: {} configured, {} by law, {} direct seats and votes each",
                counts.districts,
                number_of_districts_by_law(districts.area_type(), population)?,
                counts.direct_seats_per_district
            );
        }
        None => println!("   {}", "Population unknown, seats cannot be calculated".yellow()),
    }
    if let Some(eligible) = election.number_of_eligible_voters(root.id()) {
        println!("   Eligible voters: {}", eligible.to_string().bright_yellow());
    }

    println!("\n📍 Districts");
    for district in root.all_children() {
        let indent = match district.kind() {
            DistrictKind::PollingStation => "      ",
            _ => "   ",
        };
        println!("{}{} [{}]", indent, district.name(), district.key().dimmed());
    }

    println!("\n👥 Nominations");
    let types = election.nomination_types().ok();
    for (index, nomination) in election.nominations().iter().enumerate() {
        let party = nomination
            .party()
            .map(|party| party.short_name.clone())
            .unwrap_or_else(|| "-".to_string());
        let nomination_type = match types.as_ref().map(|types| types[index]) {
            Some(t) => format!("{:?}", t).to_lowercase(),
            None => "?".to_string(),
        };
        println!(
            "   {:<32} {:<8} {}",
            nomination.person().to_string(),
            party.bright_cyan(),
            nomination_type.dimmed()
        );
    }

    Ok(())
}
