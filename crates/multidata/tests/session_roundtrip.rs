use std::fs;
use std::path::Path;

use multidata::infra::config::Config;
use multidata::{
    LabelMode, Orientation, RunSettings, Session, SessionRecord, SessionStore, WriteOptions,
};

fn write_fixture(dir: &Path) {
    fs::write(dir.join("alpha.dat"), "T1 1 2 3\nT2 4 5 6\n").unwrap();
    fs::write(dir.join("beta.dat"), "x y z\n7 8 9\n10 11\n").unwrap();
    fs::write(dir.join("empty.dat"), "").unwrap();
}

#[test]
fn configure_persist_reload_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    write_fixture(temp.path());
    let session = Session::new(RunSettings::from_config(temp.path(), &Config::default()));

    let input = format!(
        "{dir}/alpha.dat,row,[0:1];{dir}/*.dat,c,[2.0],0,1;{dir}/none*.dat,r,[]",
        dir = temp.path().display()
    );
    let configured = session.run(Some(&input)).unwrap();

    assert_eq!(
        configured.extraction.titles(),
        ["T1", "T2", "2", "T1", "z", "x"]
    );
    assert_eq!(
        configured.extraction.contents(),
        [
            vec!["1", "2", "3"],
            vec!["4", "5", "6"],
            vec!["5"],
            vec!["T2"],
            vec!["9"],
            vec!["7", "10"],
        ]
    );

    let reloaded = session.run(None).unwrap();
    assert_eq!(reloaded.extraction, configured.extraction);
    assert_eq!(reloaded.record, configured.record);
}

#[test]
fn recorded_titles_relabel_a_later_run() {
    let temp = tempfile::tempdir().unwrap();
    write_fixture(temp.path());
    let session = Session::new(RunSettings::from_config(temp.path(), &Config::default()));
    let alpha = temp.path().join("alpha.dat");

    session
        .run(Some(&format!("{},row,[0:1]", alpha.display())))
        .unwrap();
    let relabeled = session
        .run(Some(&format!("{},col,[1.2],2", alpha.display())))
        .unwrap();

    assert_eq!(relabeled.extraction.titles(), ["T1", "T2"]);
    assert_eq!(relabeled.extraction.contents(), [vec!["4"], vec!["5"]]);

    let stored = SessionStore::new(temp.path().join("infile.json"))
        .load()
        .unwrap()
        .expect("session saved");
    let selection = &stored.configurations[&1];
    assert_eq!(selection.orientation, Orientation::Column);
    assert_eq!(selection.label_mode, LabelMode::External);
    assert_eq!(selection.indices, vec![1, 2]);
}

#[test]
fn external_labels_count_across_clauses_and_files() {
    let temp = tempfile::tempdir().unwrap();
    write_fixture(temp.path());
    fs::write(temp.path().join("b1.dat"), "p q\n1 2\n3 4\n").unwrap();
    fs::write(temp.path().join("b2.dat"), "r s\n5 6\n").unwrap();
    let session = Session::new(RunSettings::from_config(temp.path(), &Config::default()));
    let recorded = SessionRecord::new(
        Vec::new(),
        WriteOptions::default(),
        (0..6).map(|index| format!("n{index}")),
    );
    session.store().save(&recorded).unwrap();

    let input = format!(
        "{dir}/alpha.dat,row,[0:1];{dir}/b?.dat,col,[0.1],2",
        dir = temp.path().display()
    );
    let configured = session.run(Some(&input)).unwrap();

    assert_eq!(
        configured.extraction.titles(),
        ["T1", "T2", "n2", "n3", "n4", "n5"]
    );
    assert_eq!(
        &configured.extraction.contents()[2..],
        [vec!["1", "3"], vec!["2", "4"], vec!["5"], vec!["6"]]
    );
    let saved: Vec<_> = configured.record.titles.values().cloned().collect();
    assert_eq!(saved, ["T1", "T2", "n2", "n3", "n4", "n5"]);

    let reloaded = session.run(None).unwrap();
    assert_eq!(reloaded.extraction, configured.extraction);
}
