use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::table::SeasonTable;

pub fn double_digits(number: u32) -> String {
    format!("{number:02}")
}

/// `2019-20.csv` style file name of the season starting in `start_year` (last two digits).
pub fn season_file_name(start_year: u32) -> String {
    format!(
        "20{}-{}.csv",
        double_digits(start_year),
        double_digits(start_year + 1)
    )
}

/// Label stored on matches from a file without a `Season` column.
pub fn season_label(start_year: u32) -> String {
    format!("20{}", double_digits(start_year))
}

pub fn season_path(dir: &Path, start_year: u32) -> PathBuf {
    dir.join(season_file_name(start_year))
}

pub fn read_season_csv(path: &Path, season: &str) -> Result<SeasonTable> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::MissingSeasonFile(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };
    SeasonTable::from_reader(BufReader::new(file), season)
}

/// One table per season starting in `start..end` (end exclusive).
pub fn load_seasons(dir: &Path, start: u32, end: u32) -> Result<Vec<SeasonTable>> {
    if end < start {
        return Err(Error::InvalidSeasonRange { start, end });
    }
    let mut tables = Vec::with_capacity((end - start) as usize);
    for year in start..end {
        let path = season_path(dir, year);
        debug!(path = %path.display(), "loading season file");
        tables.push(read_season_csv(&path, &season_label(year))?);
    }
    info!(
        dir = %dir.display(),
        seasons = tables.len(),
        matches = tables.iter().map(|t| t.rows.len()).sum::<usize>(),
        "loaded seasons"
    );
    Ok(tables)
}
