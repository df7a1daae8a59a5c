use super::district::ElectionAreaType;
use super::{ElectionError, Result};

/// List seats per population threshold for municipalities.
const MUNICIPALITY_LIST_SEATS: &[(u32, u32)] = &[
    (0, 3),
    (200, 4),
    (750, 5),
    (1_250, 6),
    (2_500, 8),
    (5_000, 9),
    (10_000, 11),
    (15_000, 13),
    (25_000, 15),
    (35_000, 17),
    (45_000, 19),
];

const INDEPENDENT_CITY_LIST_SEATS: &[(u32, u32)] = &[(0, 21), (150_000, 24)];

const COUNTY_LIST_SEATS: &[(u32, u32)] = &[(0, 22), (200_000, 24)];

/// Number of sub-districts for small municipalities. Larger areas elect one
/// direct seat per sub-district.
const MUNICIPALITY_DISTRICTS: &[(u32, u32)] = &[(2_500, 1), (5_000, 2), (10_000, 3)];

/// Seat numbers of one election.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatCounts {
    pub list_seats: u32,
    pub direct_seats: u32,
    pub total_seats: u32,
    /// Number of sub-districts configured in the district tree.
    pub districts: u32,
    pub direct_seats_per_district: u32,
}

impl SeatCounts {
    pub fn new(area_type: ElectionAreaType, population: u32, districts: u32) -> Result<Self> {
        let list_seats = number_of_list_seats(area_type, population)?;
        let direct_seats = list_seats + 1;
        Ok(Self {
            list_seats,
            direct_seats,
            total_seats: list_seats + direct_seats,
            districts,
            direct_seats_per_district: direct_seats / districts.max(1),
        })
    }

    /// Each voter has as many votes as seats are elected directly per sub-district.
    pub fn votes_per_ballot(&self) -> u32 {
        self.direct_seats_per_district
    }
}

/// Number of list seats for the given population.
pub fn number_of_list_seats(area_type: ElectionAreaType, population: u32) -> Result<u32> {
    let table = match area_type {
        ElectionAreaType::Municipality => MUNICIPALITY_LIST_SEATS,
        ElectionAreaType::IndependentCity => INDEPENDENT_CITY_LIST_SEATS,
        ElectionAreaType::County => COUNTY_LIST_SEATS,
    };
    let row = table
        .iter()
        .rev()
        .find(|(threshold, _)| *threshold < population)
        .or_else(|| match area_type {
            // Counties and cities have no lower population bound.
            ElectionAreaType::IndependentCity | ElectionAreaType::County => table.first(),
            ElectionAreaType::Municipality => None,
        });
    row.map(|(_, seats)| *seats)
        .ok_or(ElectionError::PopulationTooLow(population))
}

pub fn number_of_direct_seats(area_type: ElectionAreaType, population: u32) -> Result<u32> {
    Ok(number_of_list_seats(area_type, population)? + 1)
}

pub fn number_of_seats(area_type: ElectionAreaType, population: u32) -> Result<u32> {
    Ok(2 * number_of_list_seats(area_type, population)? + 1)
}

/// Number of sub-districts the law expects for the given population.
pub fn number_of_districts_by_law(area_type: ElectionAreaType, population: u32) -> Result<u32> {
    let by_population = match area_type {
        ElectionAreaType::Municipality => MUNICIPALITY_DISTRICTS
            .iter()
            .find(|(limit, _)| population < *limit)
            .map(|(_, districts)| *districts),
        ElectionAreaType::IndependentCity | ElectionAreaType::County => None,
    };
    match by_population {
        Some(districts) => Ok(districts),
        None => number_of_direct_seats(area_type, population),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn municipality_thresholds() {
        let seats = |population| number_of_list_seats(ElectionAreaType::Municipality, population);
        assert_eq!(seats(1), Ok(3));
        assert_eq!(seats(200), Ok(3));
        assert_eq!(seats(201), Ok(4));
        assert_eq!(seats(1_200), Ok(5));
        assert_eq!(seats(1_250), Ok(5));
        assert_eq!(seats(1_251), Ok(6));
        assert_eq!(seats(45_001), Ok(19));
        assert_eq!(seats(0), Err(ElectionError::PopulationTooLow(0)));
    }

    #[test]
    fn county_and_city_thresholds() {
        assert_eq!(number_of_list_seats(ElectionAreaType::County, 200_000), Ok(22));
        assert_eq!(number_of_list_seats(ElectionAreaType::County, 200_001), Ok(24));
        assert_eq!(number_of_list_seats(ElectionAreaType::IndependentCity, 150_000), Ok(21));
        assert_eq!(number_of_list_seats(ElectionAreaType::IndependentCity, 150_001), Ok(24));
    }

    #[test]
    fn only_municipalities_need_inhabitants() {
        assert_eq!(number_of_list_seats(ElectionAreaType::County, 0), Ok(22));
        assert_eq!(number_of_list_seats(ElectionAreaType::IndependentCity, 0), Ok(21));
        assert_eq!(number_of_seats(ElectionAreaType::County, 0), Ok(45));
        assert_eq!(
            number_of_list_seats(ElectionAreaType::Municipality, 0),
            Err(ElectionError::PopulationTooLow(0))
        );
    }

    #[test]
    fn derived_seat_numbers() {
        assert_eq!(number_of_direct_seats(ElectionAreaType::Municipality, 1_200), Ok(6));
        assert_eq!(number_of_seats(ElectionAreaType::Municipality, 1_200), Ok(11));

        let counts = SeatCounts::new(ElectionAreaType::Municipality, 6_000, 2).unwrap();
        assert_eq!(counts.total_seats, 19);
        assert_eq!(counts.direct_seats_per_district, 5);
        assert_eq!(counts.votes_per_ballot(), 5);
    }

    #[test]
    fn districts_by_law() {
        assert_eq!(number_of_districts_by_law(ElectionAreaType::Municipality, 1_200), Ok(1));
        assert_eq!(number_of_districts_by_law(ElectionAreaType::Municipality, 7_000), Ok(3));
        assert_eq!(number_of_districts_by_law(ElectionAreaType::Municipality, 12_000), Ok(12));
        assert_eq!(number_of_districts_by_law(ElectionAreaType::County, 150_000), Ok(23));
    }
}
