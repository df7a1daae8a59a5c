use colored::*;
use instant::Instant;
use local_election::formats::election_file::{ElectionFile, LoadedResult, ResultFile};
use local_election::model::{DistrictId, Election};
use local_election::results::{ElectionResult, EvaluationOptions, NominationResultType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultReport {
    election: String,
    date: String,
    district: String,
    ballots: usize,
    invalid_ballots: usize,
    declared_ballots: Option<u32>,
    counting_progress: Option<Decimal>,
    evaluation_progress: Option<Decimal>,
    nominations: Vec<NominationReport>,
    parties: Vec<PartyReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NominationReport {
    name: String,
    party: Option<String>,
    district: String,
    result: NominationResultType,
    certain_result: Option<NominationResultType>,
    votes: u32,
    sainte_lague_value: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PartyReport {
    party: String,
    votes: u64,
    ballots: usize,
    block_votings: usize,
    seats: usize,
    certain_seats: usize,
}

/// Evaluate result files against an election and print the seat distribution.
pub fn evaluate(
    election_file: &Path,
    result_files: &[PathBuf],
    district: Option<&str>,
    options: &EvaluationOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut election = ElectionFile::read(election_file)?.into_election()?;

    // Step 1: Register the ballots of every result file
    let mut loaded: Vec<LoadedResult> = Vec::new();
    for path in result_files {
        let result = ResultFile::read(path)?.load(&mut election)?;
        if !json {
            println!(
                "📥 {}: {} ballots",
                path.display().to_string().bright_cyan(),
                result.ballots.len().to_string().bright_yellow()
            );
        }
        for error in &result.errors {
            eprintln!("⚠️  {}: {}", path.display(), error.to_string().yellow());
        }
        loaded.push(result);
    }

    // Step 2: Evaluate and merge
    let election = election;
    let mut results = loaded
        .into_iter()
        .map(|result| result.into_result(&election, options))
        .collect::<Result<Vec<_>, _>>()?;
    let merged = match results.len() {
        0 => ElectionResult::builder(&election).options(options).build()?,
        1 => results.remove(0),
        _ => {
            let others: Vec<&ElectionResult> = results[1..].iter().collect();
            results[0].add(&others)?
        }
    };

    // Step 3: Narrow down to a district
    let (result, area) = match district {
        Some(key) => {
            let area = election
                .districts()
                .find_by_key(key)
                .ok_or_else(|| format!("Unknown district: {}", key))?
                .id();
            (merged.filter_by_district(area)?, area)
        }
        None => {
            let root = election.districts().root().id();
            (merged, root)
        }
    };

    let report = build_report(&election, &result, area, options.progress_scale);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        println!(
            "\n⏱️  Evaluated in {:.2} ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
    }
    Ok(())
}

fn build_report(
    election: &Election,
    result: &ElectionResult,
    area: DistrictId,
    progress_scale: u32,
) -> ResultReport {
    let district = election
        .districts()
        .get(area)
        .map(|district| district.name().to_string())
        .unwrap_or_default();

    let nominations = result
        .nomination_results()
        .iter()
        .filter_map(|nomination_result| {
            let nomination = election.nomination(nomination_result.nomination())?;
            Some(NominationReport {
                name: nomination.person().to_string(),
                party: nomination.party().map(|party| party.short_name.clone()),
                district: election
                    .districts()
                    .get(nomination.district())
                    .map(|district| district.name().to_string())
                    .unwrap_or_default(),
                result: nomination_result.result_type(),
                certain_result: nomination_result.certain_result_type(),
                votes: nomination_result.number_of_votes(),
                sainte_lague_value: nomination_result.sainte_lague_value(),
            })
        })
        .collect();

    let parties = result
        .party_results()
        .iter()
        .map(|party_result| PartyReport {
            party: party_result.party().short_name.clone(),
            votes: party_result.number_of_votes(),
            ballots: party_result.number_of_ballots(),
            block_votings: party_result.number_of_block_votings(),
            seats: party_result.number_of_seats(),
            certain_seats: party_result.number_of_certain_seats(),
        })
        .collect();

    ResultReport {
        election: election.name().to_string(),
        date: election.date().format("%Y-%m-%d").to_string(),
        district,
        ballots: result.ballots_by_district(area).count(),
        invalid_ballots: result.number_of_invalid_ballots_in(area),
        declared_ballots: result.declared_ballots(area),
        counting_progress: result.counting_progress(area, progress_scale),
        evaluation_progress: result.evaluation_progress(area, progress_scale),
        nominations,
        parties,
    }
}

fn print_report(report: &ResultReport) {
    println!(
        "\n🗳️  {} ({}), {}",
        report.election.bright_cyan().bold(),
        report.date,
        report.district.bright_cyan()
    );
    println!(
        "   Ballots: {} ({} invalid)",
        report.ballots.to_string().bright_yellow(),
        report.invalid_ballots
    );
    if let (Some(declared), Some(counting), Some(evaluation)) = (
        report.declared_ballots,
        report.counting_progress,
        report.evaluation_progress,
    ) {
        println!(
            "   Progress: {}% of {} declared ballots counted, {}% evaluated",
            counting, declared, evaluation
        );
    }

    println!("\n🏛️  Parties");
    for party in &report.parties {
        println!(
            "   {:<8} {:>8} votes {:>6} ballots {:>6} block {:>3} seats ({} certain)",
            party.party.bright_cyan(),
            party.votes,
            party.ballots,
            party.block_votings,
            party.seats.to_string().bright_green().bold(),
            party.certain_seats
        );
    }

    println!("\n👥 Nominations");
    for nomination in &report.nominations {
        let result = nomination.result.to_string();
        let result = match nomination.result {
            NominationResultType::Direct | NominationResultType::DirectBalanceSeat => {
                result.bright_green().bold()
            }
            NominationResultType::List | NominationResultType::ListOverhangSeat => result.green(),
            NominationResultType::DirectDraw
            | NominationResultType::DirectDrawList
            | NominationResultType::ListDraw => result.yellow().bold(),
            NominationResultType::NotElected => result.dimmed(),
        };
        let certain = if nomination.certain_result.is_some() { "✔" } else { " " };
        println!(
            "   {:<32} {:<8} {:>6} {:>12} {} {}",
            nomination.name,
            nomination.party.as_deref().unwrap_or("-"),
            nomination.votes,
            nomination.sainte_lague_value.to_string(),
            certain,
            result
        );
    }
}
