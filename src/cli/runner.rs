use std::path::Path;

use tracing::info;

use geostretch::{CrsRegistry, WhiteBalanceParams, api};

use super::args::{CliArgs, Command};
use super::errors::AppError;

fn resolve_params(
    percent: Option<f64>,
    params_file: Option<&Path>,
) -> Result<WhiteBalanceParams, AppError> {
    let mut params = match params_file {
        Some(path) => WhiteBalanceParams::from_json_file(path)?,
        None => WhiteBalanceParams::default(),
    };
    if let Some(p) = percent {
        params.percent_for_balance = p;
    }
    Ok(params.validated()?)
}

fn check_extension(path: &Path, expected: &'static str) -> Result<(), AppError> {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected));
    if ok {
        Ok(())
    } else {
        Err(AppError::InvalidExtension {
            expected,
            path: path.display().to_string(),
        })
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    match args.command {
        Command::WhiteBalance {
            input,
            output,
            percent,
            params,
        } => {
            let params = resolve_params(percent, params.as_deref())?;
            api::white_balance_to_path(&input, &output, &params)?;
            info!("Successfully processed: {:?} -> {:?}", input, output);
        }
        Command::MaskNodata {
            reference,
            input,
            output,
        } => {
            api::mask_nodata_to_path(&reference, &input, &output)?;
            info!("Successfully processed: {:?} -> {:?}", input, output);
        }
        Command::Bounds { input } => {
            let registry = CrsRegistry::new()?;
            let bounds = api::raster_bounds(&input, &registry)?;
            println!(
                "northwest: {:.8} {:.8}",
                bounds.northwest.x, bounds.northwest.y
            );
            println!(
                "southeast: {:.8} {:.8}",
                bounds.southeast.x, bounds.southeast.y
            );
        }
        Command::MaxPixel { input } => {
            let (max, width, height) = api::max_pixel(&input)?;
            println!("max: {} ({}x{})", max, width, height);
        }
        Command::GeojsonToShp { input, output } => {
            check_extension(&output, "shp")?;
            let registry = CrsRegistry::new()?;
            let report = api::geojson_to_shapefile(&input, &output, &registry)?;
            info!(
                "Exported {} feature(s), skipped {}",
                report.features_written, report.features_skipped
            );
            for file in &report.files {
                println!("{}", file.display());
            }
        }
    }

    Ok(())
}
