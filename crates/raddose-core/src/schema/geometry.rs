use super::enums::{AbsCoefCalc, ContainerMaterialType, CrystalType, RightAngle, Subprogram};
use super::record::{
    FieldDef, FieldRecord, SchemaOptions, apply_record, field, render_fields, required,
    validate_fields,
};
use super::tokens::{TokenShape, Tokens};
use crate::domain::{RaddoseError, RaddoseResult, Section};

const DIMENSIONS: TokenShape = TokenShape::NonNegative { arities: &[1, 2, 3] };
const UNIT_CELL: TokenShape = TokenShape::NonNegative { arities: &[3, 6] };
const SURROUNDING_THICKNESS: TokenShape = TokenShape::NonNegative { arities: &[3] };
const ELEMENTS: TokenShape = TokenShape::Composition;

/// The `Crystal` block: shape, size, composition and surroundings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySpec {
    pub kind: CrystalType,
    pub wireframe_type: Option<String>,
    pub model_file: Option<String>,
    pub dimensions: Tokens,
    pub pixels_per_micron: Option<f64>,
    pub angle_p: Option<f64>,
    pub angle_l: Option<f64>,
    pub container_material_type: Option<ContainerMaterialType>,
    pub material_mixture: Option<String>,
    pub material_elements: Option<Tokens>,
    pub container_thickness: Option<f64>,
    pub container_density: Option<f64>,
    pub abs_coef_calc: Option<AbsCoefCalc>,
    pub pdb: Option<String>,
    pub seq_file: Option<String>,
    pub cif: Option<String>,
    pub unit_cell: Option<Tokens>,
    pub num_monomers: Option<u64>,
    pub num_residues: Option<u64>,
    pub num_rna: Option<u64>,
    pub num_dna: Option<u64>,
    pub num_carb: Option<u64>,
    pub protein_heavy_atoms: Option<Tokens>,
    pub solvent_heavy_conc: Option<Tokens>,
    pub solvent_fraction: Option<f64>,
    pub protein_conc: Option<f64>,
    pub small_mole_atoms: Option<Tokens>,
    pub calculate_pe_escape: Option<bool>,
    pub calculate_fl_escape: Option<bool>,
    pub calc_surrounding: Option<bool>,
    pub surrounding_heavy_conc: Option<Tokens>,
    pub goniometer_axis: Option<RightAngle>,
    pub polarisation_direction: Option<RightAngle>,
    pub density_based: Option<bool>,
    pub surrounding_elements: Option<Tokens>,
    pub surrounding_density: Option<f64>,
    pub subprogram: Option<Subprogram>,
    pub runs: Option<i64>,
    pub sim_photons: Option<i64>,
    pub surrounding_thickness: Option<Tokens>,
}

impl GeometrySpec {
    pub fn new(kind: CrystalType, dimensions: impl Into<Tokens>) -> Self {
        Self {
            kind,
            wireframe_type: None,
            model_file: None,
            dimensions: dimensions.into(),
            pixels_per_micron: None,
            angle_p: None,
            angle_l: None,
            container_material_type: None,
            material_mixture: None,
            material_elements: None,
            container_thickness: None,
            container_density: None,
            abs_coef_calc: None,
            pdb: None,
            seq_file: None,
            cif: None,
            unit_cell: None,
            num_monomers: None,
            num_residues: None,
            num_rna: None,
            num_dna: None,
            num_carb: None,
            protein_heavy_atoms: None,
            solvent_heavy_conc: None,
            solvent_fraction: None,
            protein_conc: None,
            small_mole_atoms: None,
            calculate_pe_escape: None,
            calculate_fl_escape: None,
            calc_surrounding: None,
            surrounding_heavy_conc: None,
            goniometer_axis: None,
            polarisation_direction: None,
            density_based: None,
            surrounding_elements: None,
            surrounding_density: None,
            subprogram: None,
            runs: None,
            sim_photons: None,
            surrounding_thickness: None,
        }
    }

    /// Keyword table in `Crystal` block order.
    pub fn fields() -> Vec<FieldDef<Self>> {
        vec![
            field!(GeometrySpec, "Type", kind),
            field!(GeometrySpec, "WireframeType", wireframe_type),
            field!(GeometrySpec, "ModelFile", model_file),
            field!(GeometrySpec, "Dimensions", dimensions, shape = DIMENSIONS),
            field!(GeometrySpec, "PixelsPerMicron", pixels_per_micron, non_negative),
            field!(GeometrySpec, "AngleP", angle_p),
            field!(GeometrySpec, "AngleL", angle_l),
            field!(GeometrySpec, "ContainerMaterialType", container_material_type),
            field!(GeometrySpec, "MaterialMixture", material_mixture),
            field!(GeometrySpec, "MaterialElements", material_elements, shape = ELEMENTS),
            field!(GeometrySpec, "ContainerThickness", container_thickness, non_negative),
            field!(GeometrySpec, "ContainerDensity", container_density, non_negative),
            field!(GeometrySpec, "AbsCoefCalc", abs_coef_calc),
            field!(GeometrySpec, "Pdb", pdb),
            field!(GeometrySpec, "SeqFile", seq_file),
            field!(GeometrySpec, "CIF", cif),
            field!(GeometrySpec, "UnitCell", unit_cell, shape = UNIT_CELL),
            field!(GeometrySpec, "NumMonomers", num_monomers),
            field!(GeometrySpec, "NumResidues", num_residues),
            field!(GeometrySpec, "NumRNA", num_rna),
            field!(GeometrySpec, "NumDNA", num_dna),
            field!(GeometrySpec, "NumCarb", num_carb),
            field!(GeometrySpec, "ProteinHeavyAtoms", protein_heavy_atoms, shape = ELEMENTS),
            field!(GeometrySpec, "SolventHeavyConc", solvent_heavy_conc, shape = ELEMENTS),
            field!(GeometrySpec, "SolventFraction", solvent_fraction, non_negative),
            field!(GeometrySpec, "ProteinConc", protein_conc, non_negative),
            field!(GeometrySpec, "SmallMoleAtoms", small_mole_atoms, shape = ELEMENTS),
            field!(GeometrySpec, "CalculatePEescape", calculate_pe_escape),
            field!(GeometrySpec, "CalculateFLEscape", calculate_fl_escape),
            field!(GeometrySpec, "CalcSurrounding", calc_surrounding),
            field!(GeometrySpec, "SurroundingHeavyConc", surrounding_heavy_conc, shape = ELEMENTS),
            field!(GeometrySpec, "GoniometerAxis", goniometer_axis),
            field!(GeometrySpec, "PolarisationDirection", polarisation_direction),
            field!(GeometrySpec, "DensityBased", density_based),
            field!(GeometrySpec, "SurroundingElements", surrounding_elements, shape = ELEMENTS),
            field!(GeometrySpec, "SurroundingDensity", surrounding_density, non_negative),
            field!(GeometrySpec, "Subprogram", subprogram),
            field!(GeometrySpec, "Runs", runs),
            field!(GeometrySpec, "SimPhotons", sim_photons),
            field!(
                GeometrySpec,
                "SurroundingThickness",
                surrounding_thickness,
                shape = SURROUNDING_THICKNESS
            ),
        ]
    }

    pub fn from_record(record: &FieldRecord, options: SchemaOptions) -> RaddoseResult<Self> {
        let kind = required(Section::Crystal, "Type", record)?;
        let dimensions: Tokens = required(Section::Crystal, "Dimensions", record)?;
        let mut spec = Self::new(kind, dimensions);
        apply_record(Section::Crystal, &Self::fields(), record, options, &mut spec)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> RaddoseResult<()> {
        validate_fields(&Self::fields(), self)?;
        self.validate_polyhedron_model()
    }

    fn validate_polyhedron_model(&self) -> RaddoseResult<()> {
        if self.kind != CrystalType::Polyhedron
            || (self.wireframe_type.is_some() && self.model_file.is_some())
        {
            return Ok(());
        }

        Err(RaddoseError::MissingDependentField {
            field: "Type",
            value: self.kind.as_str().to_string(),
            dependents: vec![
                ("WireframeType", self.wireframe_type.clone()),
                ("ModelFile", self.model_file.clone()),
            ],
        })
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        render_fields(&Self::fields(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::GeometrySpec;
    use crate::domain::RaddoseError;
    use crate::schema::enums::{AbsCoefCalc, CrystalType, RightAngle};
    use crate::schema::record::{FieldRecord, FieldValue, SchemaOptions};
    use crate::schema::tokens::Tokens;

    fn insulin() -> GeometrySpec {
        GeometrySpec {
            pixels_per_micron: Some(0.1),
            abs_coef_calc: Some(AbsCoefCalc::Rd3d),
            unit_cell: Some(Tokens::from([78.02, 78.02, 78.02])),
            num_monomers: Some(24),
            num_residues: Some(51),
            protein_heavy_atoms: Some(crate::tokens!["Zn", 0.333, "S", 6]),
            solvent_heavy_conc: Some(crate::tokens!["P", 425]),
            solvent_fraction: Some(0.64),
            ..GeometrySpec::new(CrystalType::Cuboid, [100, 100, 100])
        }
    }

    #[test]
    fn populated_geometry_renders_in_schema_order() {
        let spec = insulin();
        spec.validate().expect("insulin crystal is valid");

        let entries = spec.entries();
        let names: Vec<&str> = entries.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            [
                "Type",
                "Dimensions",
                "PixelsPerMicron",
                "AbsCoefCalc",
                "UnitCell",
                "NumMonomers",
                "NumResidues",
                "ProteinHeavyAtoms",
                "SolventHeavyConc",
                "SolventFraction"
            ]
        );
        assert_eq!(entries[0].1, "Cuboid");
        assert_eq!(entries[1].1, "100 100 100");
        assert_eq!(entries[7].1, "Zn 0.333 S 6");
    }

    #[test]
    fn polyhedron_requires_wireframe_and_model_file() {
        let bare = GeometrySpec::new(CrystalType::Polyhedron, [100, 100, 100]);
        let error = bare.validate().expect_err("model files are required");
        assert_eq!(
            error,
            RaddoseError::MissingDependentField {
                field: "Type",
                value: "Polyhedron".to_string(),
                dependents: vec![("WireframeType", None), ("ModelFile", None)],
            }
        );

        let half = GeometrySpec {
            wireframe_type: Some("OBJ".to_string()),
            ..bare.clone()
        };
        assert!(matches!(
            half.validate(),
            Err(RaddoseError::MissingDependentField { .. })
        ));

        let complete = GeometrySpec {
            wireframe_type: Some("OBJ".to_string()),
            model_file: Some("crystal.obj".to_string()),
            ..bare
        };
        assert!(complete.validate().is_ok());
    }

    #[test]
    fn negative_reals_fail_out_of_range() {
        let spec = GeometrySpec {
            solvent_fraction: Some(-0.2),
            ..insulin()
        };
        assert!(matches!(
            spec.validate(),
            Err(RaddoseError::OutOfRange { field: "SolventFraction", .. })
        ));

        let spec = GeometrySpec::new(CrystalType::Spherical, [-10.0]);
        assert!(matches!(
            spec.validate(),
            Err(RaddoseError::OutOfRange { field: "Dimensions", .. })
        ));
    }

    #[test]
    fn signed_angles_are_accepted() {
        let spec = GeometrySpec {
            angle_p: Some(-45.0),
            angle_l: Some(-10.0),
            goniometer_axis: Some(RightAngle::Ninety),
            ..GeometrySpec::new(CrystalType::Cylinder, "40 20")
        };
        assert!(spec.validate().is_ok());
        assert!(spec.entries().contains(&("GoniometerAxis", "90".to_string())));
    }

    #[test]
    fn values_with_line_breaks_are_rejected() {
        let smuggled = GeometrySpec {
            seq_file: Some("a.fasta\nWedge 0 1".to_string()),
            ..insulin()
        };
        assert_eq!(
            smuggled.validate(),
            Err(RaddoseError::LineBreakInValue { field: "SeqFile" })
        );

        let carriage = GeometrySpec::new(CrystalType::Cuboid, "10 10\r10");
        assert_eq!(
            carriage.validate(),
            Err(RaddoseError::LineBreakInValue { field: "Dimensions" })
        );
    }

    #[test]
    fn unit_cell_accepts_three_or_six_lengths() {
        let six = GeometrySpec {
            unit_cell: Some(Tokens::from([91.539, 91.539, 299.842, 90.0, 90.0, 90.0])),
            ..insulin()
        };
        assert!(six.validate().is_ok());

        let four = GeometrySpec {
            unit_cell: Some(Tokens::from([1.0, 2.0, 3.0, 4.0])),
            ..insulin()
        };
        assert!(matches!(
            four.validate(),
            Err(RaddoseError::MalformedTuple { field: "UnitCell", .. })
        ));
    }

    #[test]
    fn records_are_decoded_through_the_field_table() {
        let record = FieldRecord::new()
            .with("Type", "CUBOID")
            .with("Dimensions", vec![100, 80, 60])
            .with("AbsCoefCalc", "exp")
            .with("Pdb", "1KMT")
            .with("GoniometerAxis", 90);

        let spec = GeometrySpec::from_record(&record, SchemaOptions::default())
            .expect("record is valid");
        assert_eq!(spec.kind, CrystalType::Cuboid);
        assert_eq!(spec.abs_coef_calc, Some(AbsCoefCalc::Exp));
        assert_eq!(spec.pdb.as_deref(), Some("1KMT"));
        assert_eq!(spec.goniometer_axis, Some(RightAngle::Ninety));
    }

    #[test]
    fn record_casing_variants_yield_the_same_geometry() {
        let parsed: Vec<GeometrySpec> = ["Cuboid", "CUBOID", "cuboid"]
            .into_iter()
            .map(|spelling| {
                let record = FieldRecord::new()
                    .with("Type", spelling)
                    .with("Dimensions", "100 100 100");
                GeometrySpec::from_record(&record, SchemaOptions::default())
                    .expect("casing is ignored")
            })
            .collect();
        assert!(parsed.iter().all(|spec| *spec == parsed[0]));
    }

    #[test]
    fn unknown_fields_are_rejected_unless_relaxed() {
        let record = FieldRecord::new()
            .with("Type", "Cuboid")
            .with("Dimensions", "100 100 100")
            .with("coefcalc", "exp");

        let error = GeometrySpec::from_record(&record, SchemaOptions::default())
            .expect_err("coefcalc is not a crystal keyword");
        assert!(matches!(
            error,
            RaddoseError::UnknownField { ref field, .. } if field == "coefcalc"
        ));

        let relaxed = SchemaOptions {
            reject_unknown_fields: false,
        };
        let spec = GeometrySpec::from_record(&record, relaxed).expect("unknown field is skipped");
        assert_eq!(spec.entries().len(), 2);
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let record = FieldRecord::new()
            .with("Type", "Cuboid")
            .with("Dimensions", FieldValue::Null);
        assert!(matches!(
            GeometrySpec::from_record(&record, SchemaOptions::default()),
            Err(RaddoseError::MissingRequiredField { field: "Dimensions", .. })
        ));
    }

    #[test]
    fn enum_fields_are_validated_independently() {
        for (name, value) in [
            ("ContainerMaterialType", "plastic"),
            ("AbsCoefCalc", "guess"),
            ("Subprogram", "raytrace"),
        ] {
            let record = FieldRecord::new()
                .with("Type", "Cuboid")
                .with("Dimensions", "10 10 10")
                .with(name, value);
            let error = GeometrySpec::from_record(&record, SchemaOptions::default())
                .expect_err("value is outside the enumeration");
            assert!(
                matches!(error, RaddoseError::InvalidEnumValue { field, .. } if field == name),
                "{name} should fail with InvalidEnumValue, got {error:?}"
            );
        }

        let record = FieldRecord::new()
            .with("Type", "Cuboid")
            .with("Dimensions", "10 10 10")
            .with("PolarisationDirection", 45);
        assert!(matches!(
            GeometrySpec::from_record(&record, SchemaOptions::default()),
            Err(RaddoseError::InvalidEnumValue { field: "PolarisationDirection", .. })
        ));
    }
}
