mod common;

use gdal::Dataset;
use gdal::raster::GdalDataType;

use common::{SIRGAS_GT, dir_is_empty, mem_dataset, read_all, write_tiff};
use geostretch::ColorRole::{self, *};
use geostretch::core::processing::white_balance::{white_balance_band, white_balance_dataset};
use geostretch::io::GdalIoError;
use geostretch::{Error, WhiteBalanceParams, white_balance_to_path};

const W: usize = 4;
const H: usize = 3;

fn ramp(offset: u16, step: u16) -> Vec<u16> {
    (0..(W * H) as u16).map(|i| offset + i * step).collect()
}

fn rgbn_scene() -> Dataset {
    mem_dataset(
        W,
        H,
        &[
            (Undefined, ramp(5_000, 1)),
            (Red, ramp(100, 7)),
            (Green, ramp(40, 3)),
            (Blue, vec![9, 3, 200, 41, 41, 0, 17, 999, 3, 64, 128, 12]),
        ],
    )
}

fn expected(samples: &[u16], params: &WhiteBalanceParams) -> Vec<u8> {
    let samples: Vec<f64> = samples.iter().map(|v| *v as f64).collect();
    white_balance_band(&samples, params).unwrap()
}

#[test]
fn writes_three_stretched_byte_bands() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("balanced.tif");
    let source = rgbn_scene();
    let params = WhiteBalanceParams::default();

    white_balance_dataset(&source, &output, &params).unwrap();

    let out = Dataset::open(&output).unwrap();
    assert_eq!(out.raster_count() as usize, 3);
    assert_eq!(out.raster_size(), (W, H));
    assert_eq!(out.geo_transform().unwrap(), SIRGAS_GT);

    let sources = [ramp(100, 7), ramp(40, 3), read_all::<u16>(&source, 4)];
    for (i, (samples, role)) in sources.iter().zip([Red, Green, Blue]).enumerate() {
        let band = out.rasterband(i + 1).unwrap();
        assert_eq!(band.band_type(), GdalDataType::UInt8);
        assert_eq!(ColorRole::from_interpretation(band.color_interpretation()), role);
        assert_eq!(read_all::<u8>(&out, i + 1), expected(samples, &params));
    }
}

#[test]
fn stretch_spans_full_byte_range() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("balanced.tif");
    white_balance_dataset(&rgbn_scene(), &output, &WhiteBalanceParams::default()).unwrap();

    let out = Dataset::open(&output).unwrap();
    let red = read_all::<u8>(&out, 1);
    assert_eq!(red.iter().min(), Some(&0));
    assert_eq!(red.iter().max(), Some(&255));
    assert!(red.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn flat_band_is_degenerate_and_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("balanced.tif");
    let source = mem_dataset(
        W,
        H,
        &[
            (Red, ramp(100, 7)),
            (Green, vec![42u16; W * H]),
            (Blue, ramp(40, 3)),
        ],
    );

    let err = white_balance_dataset(&source, &output, &WhiteBalanceParams::default());
    assert!(matches!(err, Err(Error::DegenerateRange { low, high }) if low == 42.0 && high == 42.0));
    assert!(dir_is_empty(dir.path()));
}

#[test]
fn untagged_three_band_raster_has_no_fallback_band() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("balanced.tif");
    let source = mem_dataset(
        W,
        H,
        &[
            (Undefined, ramp(1, 1)),
            (Undefined, ramp(2, 1)),
            (Undefined, ramp(3, 1)),
        ],
    );

    let err = white_balance_dataset(&source, &output, &WhiteBalanceParams::default());
    assert!(matches!(
        err,
        Err(Error::Gdal(GdalIoError::MissingBand { index: 4, .. }))
    ));
    assert!(dir_is_empty(dir.path()));
}

#[test]
fn missing_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("balanced.tif");
    let err = white_balance_to_path(
        &dir.path().join("absent.tif"),
        &output,
        &WhiteBalanceParams::default(),
    );
    assert!(err.is_err());
    assert!(dir_is_empty(dir.path()));
}

#[test]
fn invalid_percent_is_rejected_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.tif");
    let output = dir.path().join("balanced.tif");
    write_tiff::<u16>(&input, W, H, &[ramp(1, 1), ramp(2, 1), ramp(3, 1)]);

    let params = WhiteBalanceParams {
        percent_for_balance: 75.0,
    };
    let err = white_balance_to_path(&input, &output, &params);
    assert!(matches!(err, Err(Error::InvalidArgument { .. })));
    assert!(!output.exists());
}
