//! Read/write workspace JSON files.
//!
//! Workspace JSON is the portable representation of a built model:
//! - every variable with its value, range and constancy
//! - every derived function as a typed expression tree
//! - named sets (the POI set in particular)
//!
//! Loading re-declares every node in file order, so a file whose functions
//! reference unknown or later names is rejected.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{ModelError, Result};
use crate::workspace::Workspace;

/// Write a workspace JSON file.
pub fn write_workspace_json(path: &Path, ws: &Workspace) -> Result<()> {
    let file = File::create(path).map_err(|e| ModelError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, ws)?;
    writer.flush().map_err(|e| ModelError::io(path, e))?;
    Ok(())
}

/// Read a workspace JSON file.
pub fn read_workspace_json(path: &Path) -> Result<Workspace> {
    let file = File::open(path).map_err(|e| ModelError::io(path, e))?;
    workspace_from_reader(BufReader::new(file))
}

pub fn workspace_from_reader<R: std::io::Read>(reader: R) -> Result<Workspace> {
    let mut ws: Workspace = serde_json::from_reader(reader)?;
    ws.reindex()?;
    Ok(ws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::{Expr, ExternalFn, Function, RealVar};

    fn sample() -> Workspace {
        let mut ws = Workspace::new("sample");
        ws.declare_var("MH", RealVar::constant(125.0)).unwrap();
        ws.declare_var("CF", RealVar::ranged(1.0, -2.0, 2.0)).unwrap();
        ws.declare_var("CV", RealVar::ranged(1.0, 0.0, 1.5)).unwrap();
        ws.declare_var("mb", RealVar::constant(2.79)).unwrap();
        ws.declare_function(
            "cgammaSq",
            Function::new(
                "LO",
                Expr::External {
                    func: ExternalFn::ScaleHGamGamLoSm,
                    args: ["MH", "CF", "CV", "mb", "CF"].map(String::from).to_vec(),
                },
            ),
        )
        .unwrap();
        ws.declare_function(
            "ratio",
            Function::new("", Expr::quotient(Expr::var("cgammaSq"), Expr::square("CV"))),
        )
        .unwrap();
        ws.define_set("POI", &["CV", "CF"]).unwrap();
        ws
    }

    #[test]
    fn file_roundtrip_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ws.json");
        let mut ws = sample();
        ws.set_value("CF", 0.7).unwrap();
        write_workspace_json(&path, &ws).unwrap();

        let loaded = read_workspace_json(&path).unwrap();
        assert_eq!(loaded.name(), "sample");
        assert_eq!(loaded.len(), ws.len());
        assert_eq!(loaded.set("POI").unwrap(), ["CV", "CF"]);
        assert!((loaded.eval("ratio").unwrap() - ws.eval("ratio").unwrap()).abs() < 1e-12);
    }

    #[test]
    fn forward_references_are_rejected() {
        let json = r#"{
            "name": "bad",
            "entries": [
                {"name": "f", "node": {"func": {"title": "", "expr": {"Ref": "x"}}}},
                {"name": "x", "node": {"var": {"value": 1.0, "min": 1.0, "max": 1.0, "constant": true}}}
            ],
            "sets": {}
        }"#;
        let err = workspace_from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::UnknownName(_)));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_workspace_json(Path::new("/no/such/ws.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_errors_surface_on_flush() {
        let err = write_workspace_json(Path::new("/dev/full"), &sample()).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. } | ModelError::Json(_)));
    }

    #[test]
    fn malformed_splines_are_rejected() {
        let json = r#"{
            "name": "bad",
            "entries": [
                {"name": "MH", "node": {"var": {"value": 125.0, "min": 125.0, "max": 125.0, "constant": true}}},
                {"name": "mb", "node": {"func": {"title": "", "expr": {"Spline": {"x": "MH", "spline": {"x": [], "y": [], "m": []}}}}}}
            ],
            "sets": {}
        }"#;
        let err = workspace_from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::Expression(_)));

        let mismatched = json.replace(r#""x": [], "y": [], "m": []"#, r#""x": [120.0, 130.0], "y": [2.8, 2.7], "m": [0.0]"#);
        let err = workspace_from_reader(mismatched.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::Expression(_)));
    }
}
