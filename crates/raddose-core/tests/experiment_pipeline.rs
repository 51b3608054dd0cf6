use raddose_core::domain::RaddoseError;
use raddose_core::render::{WEDGE_MARKER, render_input, write_input_file};
use raddose_core::schema::{
    AbsCoefCalc, BeamSpec, BeamType, CrystalType, ExperimentConfig, ExposureSpec, GeometrySpec,
    SchemaOptions, Tokens,
};
use raddose_core::tokens;
use std::fs;
use tempfile::TempDir;

fn insulin_config() -> ExperimentConfig {
    let geometry = GeometrySpec {
        pixels_per_micron: Some(0.1),
        abs_coef_calc: Some(AbsCoefCalc::Rd3d),
        unit_cell: Some(Tokens::from([78.02, 78.02, 78.02])),
        num_monomers: Some(24),
        ..GeometrySpec::new(CrystalType::Cuboid, [100, 100, 100])
    };
    let beam = BeamSpec {
        fwhm: Some(Tokens::from([20, 70])),
        collimation: Some(tokens!["Rectangular", 100, 100]),
        ..BeamSpec::new(BeamType::Gaussian, 2e12, 12.1)
    };
    ExperimentConfig::new(geometry, beam, ExposureSpec::new([0.0, 90.0], 50.0))
        .expect("insulin experiment should validate")
}

#[test]
fn insulin_experiment_renders_engine_keywords() {
    let temp = TempDir::new().expect("tempdir should be created");
    let path = temp.path().join("insulin.txt");

    write_input_file(&insulin_config(), &path).expect("input file should be written");
    let written = fs::read_to_string(&path).expect("input file should be readable");

    assert_eq!(
        written,
        "Crystal\n\
         Type Cuboid\n\
         Dimensions 100 100 100\n\
         PixelsPerMicron 0.1\n\
         AbsCoefCalc RD3D\n\
         UnitCell 78.02 78.02 78.02\n\
         NumMonomers 24\n\
         \n\
         Beam\n\
         Type Gaussian\n\
         Flux 2000000000000.0\n\
         FWHM 20 70\n\
         Energy 12.1\n\
         Collimation Rectangular 100 100\n\
         \n\
         # Wedge\n\
         Wedge 0.0 90.0\n\
         ExposureTime 50.0\n"
    );
    assert!(written.lines().any(|line| line == "Dimensions 100 100 100"));
    assert!(written.lines().any(|line| line == "Collimation Rectangular 100 100"));
    assert!(!written.contains(':'));
}

#[test]
fn json_documents_render_like_typed_construction() {
    let document = r#"{
        "crystal": {
            "Type": "CUBOID",
            "Dimensions": [100, 100, 100],
            "PixelsPerMicron": 0.1,
            "AbsCoefCalc": "rd3d",
            "UnitCell": [78.02, 78.02, 78.02],
            "NumMonomers": 24
        },
        "beam": {
            "Type": "gaussian",
            "Flux": 2e12,
            "FWHM": [20, 70],
            "Energy": 12.1,
            "Collimation": ["Rectangular", 100, 100]
        },
        "wedge": [{ "Wedge": [0.0, 90.0], "ExposureTime": 50.0 }]
    }"#;

    let parsed = ExperimentConfig::from_json_str(document, SchemaOptions::default())
        .expect("document should validate");

    assert_eq!(render_input(&parsed), render_input(&insulin_config()));
}

#[test]
fn helical_scans_render_one_block_per_wedge() {
    let first = ExposureSpec {
        start_offset: Some(Tokens::from([0, -20, 0])),
        translate_per_degree: Some(Tokens::from([0.0, 0.2, 0.0])),
        ..ExposureSpec::new([0.0, 90.0], 25.0)
    };
    let second = ExposureSpec {
        start_offset: Some(Tokens::from([0, -2, 0])),
        ..ExposureSpec::new([90.0, 180.0], 25.0)
    };
    let config = ExperimentConfig::new(
        GeometrySpec::new(CrystalType::Cylinder, [40, 20]),
        BeamSpec::new(BeamType::TopHat, 1e12, 12.4),
        vec![first, second],
    )
    .expect("helical scan should validate");

    let rendered = render_input(&config);
    let blocks: Vec<&str> = rendered.split(WEDGE_MARKER).skip(1).collect();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].contains("StartOffset 0 -20 0"));
    assert!(blocks[1].contains("Wedge 90.0 180.0"));
}

#[test]
fn invalid_configurations_never_reach_the_filesystem() {
    let temp = TempDir::new().expect("tempdir should be created");
    let beam = BeamSpec {
        collimation: Some(tokens!["Diamond", 10, 10]),
        ..BeamSpec::new(BeamType::TopHat, 1e12, 12.4)
    };

    let error = ExperimentConfig::new(
        GeometrySpec::new(CrystalType::Cuboid, [10, 10, 10]),
        beam,
        ExposureSpec::new([0.0, 90.0], 1.0),
    )
    .expect_err("diamond collimation is invalid");

    assert!(matches!(error, RaddoseError::InvalidEnumValue { field: "Collimation", .. }));
    assert_eq!(error.exit_code(), 2);
    assert_eq!(fs::read_dir(temp.path()).expect("tempdir listable").count(), 0);
}

#[test]
fn multi_line_values_cannot_inject_keywords() {
    let document = r#"{
        "crystal": { "Type": "Cuboid", "Dimensions": [10, 10, 10], "SeqFile": "a.fasta\nWedge 0 1" },
        "beam": { "Type": "TopHat", "Flux": 1e12, "Energy": 12.4 },
        "wedge": { "Wedge": [0, 90], "ExposureTime": 1 }
    }"#;

    let error = ExperimentConfig::from_json_str(document, SchemaOptions::default())
        .expect_err("line breaks would split the keyword line");

    assert_eq!(error, RaddoseError::LineBreakInValue { field: "SeqFile" });
    assert_eq!(error.placeholder(), "INPUT.LINE_BREAK");
}
