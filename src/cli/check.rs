use anyhow::Result;
use log::info;
use std::path::PathBuf;

use conedata::pipeline::{Pipeline, TestInput};

use super::Config;

/// Process one test and print what would be written
pub fn run(file: PathBuf, config: Option<PathBuf>) -> Result<()> {
    if !file.is_file() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let config = Config::load(config.as_deref())?;
    let input = TestInput::from_scaled_csv(&file);

    info!("conedata Check");
    info!("==============");
    info!("Raw table: {}", input.raw_path.display());
    info!("Metadata:  {}", input.workbook.path().display());

    let outcome = Pipeline::new(config.processing).process_test(&input);
    match outcome.result {
        Ok(test) => {
            let data = &test.data;
            println!("Test: {}", test.name);
            println!(
                "Date: {}",
                test.metadata
                    .date
                    .as_ref()
                    .map_or_else(|| "unknown".to_string(), |d| d.to_string())
            );
            println!("Surface area: {} cm2", test.metadata.surface_area_cm2);
            println!("Heat flux: {:?} kW/m2", test.metadata.heat_flux_kw_per_m2);
            println!("Events: {}", test.metadata.events().len());
            println!();
            println!("Start offset: {} samples", data.start_offset);
            println!(
                "Delays (O2, CO2, CO): {}, {}, {} samples",
                data.delays[0], data.delays[1], data.delays[2]
            );
            println!(
                "Baselines: O2 {:.5}, CO2 {:.5}, CO {:.5}",
                data.baselines.o2, data.baselines.co2, data.baselines.co
            );
            println!("Samples: {}", data.len());
            if let Some(peak) = data.peak_hrr() {
                println!("Peak HRR: {:.1} kW/m2", peak);
            }
            println!("Optical data: {}", data.optical);
            Ok(())
        }
        Err(e) => {
            eprintln!("Rejected ({}): {}", e.kind(), e);
            std::process::exit(1);
        }
    }
}
