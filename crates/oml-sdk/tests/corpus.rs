use std::path::Path;

use oml_sdk::{
    Document, NativeContainerStore, NativeDocument, Oml, OmlError, PersistFormat, XmlConverter,
};

/// Write a native document with one `Main` fragment holding `body`.
fn write_document(oml: &Oml, path: &Path, name: &str, body: &str) {
    let mut doc = Document::new(oml.store().clone(), oml.registry().latest().clone());
    doc.set_header("Name", name).unwrap();
    doc.set_fragment_xml("Main", body.parse().unwrap());
    oml.save(&mut doc, path, None).unwrap();
}

#[test]
fn search_scenario_reports_counts_in_order() {
    let oml = Oml::new();
    let dir = tempfile::tempdir().unwrap();
    write_document(
        &oml,
        &dir.path().join("a_orders.oml"),
        "Orders",
        "<Flow><Screen Name=\"List\"/><Screen Name=\"Detail\"/></Flow>",
    );
    write_document(
        &oml,
        &dir.path().join("b_theme.oml"),
        "Theme",
        "<Theme><Style/></Theme>",
    );
    write_document(
        &oml,
        &dir.path().join("c_home.OML"),
        "Home",
        "<Flow><Screen Name=\"Home\"/></Flow>",
    );
    std::fs::write(dir.path().join("readme.txt"), "Screen Screen").unwrap();
    std::fs::create_dir(dir.path().join("nested.oml")).unwrap();

    let mut streamed = Vec::new();
    let result = oml_sdk::CorpusSearch::new(&oml)
        .scan_with_progress(dir.path(), "Screen", "OL", |line| {
            streamed.push(line.to_string())
        })
        .unwrap();

    assert_eq!(result.lines.len(), 5);
    assert_eq!(result.lines[0], "3 files found.");
    assert_eq!(result.lines[1], "[1/3] - 2 occurrences found in a_orders.oml.");
    assert_eq!(result.lines[2], "[2/3] - 0 occurrences found in b_theme.oml.");
    assert_eq!(result.lines[3], "[3/3] - 1 occurrences found in c_home.OML.");
    assert!(result.lines[4].starts_with("Elapsed time "));
    assert!(result.lines[4].ends_with('.'));
    assert_eq!(streamed, result.lines);

    let counts: Vec<usize> = result.matches.iter().map(|m| m.occurrences).collect();
    assert_eq!(counts, vec![2, 0, 1]);
    assert_eq!(result.total_occurrences(), 3);
}

#[cfg(unix)]
#[test]
fn search_includes_symlinked_documents() {
    let oml = Oml::new();
    let store = tempfile::tempdir().unwrap();
    let target = store.path().join("shared.oml");
    write_document(&oml, &target, "Shared", "<Flow><Screen/></Flow>");

    let dir = tempfile::tempdir().unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("linked.oml")).unwrap();
    std::os::unix::fs::symlink(store.path(), dir.path().join("folder.oml")).unwrap();

    let result = oml.search(dir.path(), "Screen", "OL").unwrap();
    assert_eq!(result.total_files, 1);
    assert_eq!(result.matches[0].file_name, "linked.oml");
    assert_eq!(result.matches[0].occurrences, 1);
}

#[test]
fn xml_destination_takes_xml_path() {
    let oml = Oml::new();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("module.oml");
    write_document(&oml, &input, "Portal", "<Flow/>");

    let output = dir.path().join("module.XML");
    let format = oml
        .manipulate(&input, &output, "OL", None, &["Revision:3"], &[] as &[&str])
        .unwrap();
    assert_eq!(format, PersistFormat::Xml);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("<OML><Header>"));
    assert!(text.contains("<Revision>3</Revision>"));
    assert!(text.contains("<Flow FragmentName=\"Main\"/>"));
    assert!(!text.contains('\n'));
}

#[test]
fn explicit_native_format_overrides_xml_extension() {
    let oml = Oml::new();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("module.oml");
    let output = dir.path().join("actually-native.xml");
    write_document(&oml, &input, "Portal", "<Flow/>");

    oml.manipulate(
        &input,
        &output,
        "OL",
        Some("oml"),
        &[] as &[&str],
        &["Extra:<Action/>"],
    )
    .unwrap();
    assert_eq!(
        oml.show_fragments(&output, "OL", None).unwrap(),
        vec!["Main", "Extra"]
    );
}

#[test]
fn batch_edit_atomicity_on_disk() {
    let oml = Oml::new();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("module.oml");
    let output = dir.path().join("out.oml");
    write_document(&oml, &input, "Portal", "<Flow/>");

    let err = oml
        .manipulate(
            &input,
            &output,
            "OL",
            None,
            &["Description:1", "BADLINE", "ActivationCode:2"],
            &[] as &[&str],
        )
        .unwrap_err();
    assert!(matches!(err, OmlError::MalformedEdit(_)));
    assert!(!output.exists());

    let doc = oml.open(&input, "OL").unwrap();
    assert_eq!(doc.get_header("Description").unwrap(), "");
    assert_eq!(doc.get_header("ActivationCode").unwrap(), "");
}

#[test]
fn failed_export_leaves_destination_untouched() {
    let oml = Oml::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.oml");

    let mut native = NativeDocument::new(oml.registry().latest());
    native.put_fragment("Broken", b"not a zstd frame".to_vec());
    let bytes = NativeContainerStore::new().encode(&native).unwrap();
    std::fs::write(&path, &bytes).unwrap();

    let result = oml.manipulate(&path, &path, "OL", Some("xml"), &[] as &[&str], &[] as &[&str]);
    assert!(result.is_err());
    assert_eq!(std::fs::read(&path).unwrap(), bytes);

    let fresh = dir.path().join("export.xml");
    assert!(oml
        .manipulate(&path, &fresh, "OL", None, &[] as &[&str], &[] as &[&str])
        .is_err());
    assert!(!fresh.exists());
}

#[test]
fn typed_header_edit_keeps_written_text() {
    let oml = Oml::new();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("module.oml");
    let output = dir.path().join("out.oml");
    write_document(&oml, &input, "Portal", "<Flow/>");

    oml.manipulate(
        &input,
        &output,
        "OL",
        None,
        &["IsSystemModule:1", "Revision:007"],
        &[] as &[&str],
    )
    .unwrap();
    assert_eq!(oml.show_headers(&output, "OL", Some("issystemmodule")).unwrap(), vec!["1"]);
    assert_eq!(oml.show_headers(&output, "OL", Some("Revision")).unwrap(), vec!["007"]);
}

#[test]
fn read_only_header_edit_fails() {
    let oml = Oml::new();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("module.oml");
    write_document(&oml, &input, "Portal", "<Flow/>");

    let mut doc = oml.open(&input, "OL").unwrap();
    let err = oml
        .apply_edits(&mut doc, &["lastmodifiedutc:2024-01-01T00:00:00Z"], &[] as &[&str])
        .unwrap_err();
    assert!(matches!(err, OmlError::ReadOnlyField(name) if name == "LastModifiedUTC"));
}

#[test]
fn converter_matches_fragment_mirror() {
    let oml = Oml::new();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("module.oml");
    write_document(&oml, &input, "Portal", "<Flow><Screen/></Flow>");

    let converted = XmlConverter::new().convert_file(&input);
    assert_eq!(
        converted,
        "<OML><Flow FragmentName=\"Main\"><Screen/></Flow></OML>"
    );
    assert!(XmlConverter::new()
        .convert_file(dir.path().join("missing.oml"))
        .starts_with("Error: "));
}
