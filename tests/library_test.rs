//! ロゴライブラリの統合テスト
//!
//! 一時ディレクトリ上でバッチフォルダの追加・改名・削除を確認

use logo_batch::error::LogoBatchError;
use logo_batch::library::LogoLibrary;
use logo_batch::sidecar::BrandSidecar;
use logo_batch_common::BrandGroup;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn source_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![0x89u8; 256]).unwrap();
    path
}

fn setup() -> (TempDir, LogoLibrary, PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();
    let library = LogoLibrary::new(dir.path().join("logos"));
    (dir, library, uploads)
}

fn brands(groups: &[BrandGroup]) -> Vec<&str> {
    groups.iter().map(|g| g.brand.as_str()).collect()
}

#[test]
fn test_add_logo_assigns_next_slot() {
    let (_dir, library, uploads) = setup();
    let png = source_image(&uploads, "upload.PNG");
    let svg = source_image(&uploads, "vector.svg");

    assert_eq!(library.add_logo("54a", "Air Canada", &png).unwrap(), "Air_Canada_logo1.png");
    assert_eq!(library.add_logo("54a", "Air Canada", &svg).unwrap(), "Air_Canada_logo2.svg");
    assert_eq!(library.add_logo("54a", " TD ", &png).unwrap(), "TD_logo1.png");

    let groups = library.list("54a").unwrap();
    assert_eq!(brands(&groups), vec!["Air Canada", "TD"]);
    assert_eq!(groups[0].files, vec!["Air_Canada_logo1.png", "Air_Canada_logo2.svg"]);

    let sidecar = BrandSidecar::load(&library.root().join("54a"));
    assert_eq!(sidecar.get("Air_Canada_logo2.svg"), Some("Air_Canada"));
    assert_eq!(sidecar.len(), 3);
}

#[test]
fn test_add_logo_rejects_unsupported_extension() {
    let (_dir, library, uploads) = setup();
    let bmp = source_image(&uploads, "logo.bmp");

    let result = library.add_logo("54a", "TD", &bmp);
    assert!(matches!(result, Err(LogoBatchError::UnsupportedExtension(_))));
}

#[test]
fn test_add_logo_missing_source() {
    let (_dir, library, uploads) = setup();
    let result = library.add_logo("54a", "TD", &uploads.join("missing.png"));
    assert!(matches!(result, Err(LogoBatchError::FileNotFound(_))));
}

#[test]
fn test_rename_brand_keeps_suffix() {
    let (_dir, library, uploads) = setup();
    let png = source_image(&uploads, "a.png");
    library.add_logo("54a", "Air Canada", &png).unwrap();
    library.add_logo("54a", "Air Canada", &png).unwrap();

    let outcome = library.rename_brand("54a", "Air Canada", "Air Canada Rouge").unwrap();
    assert_eq!(
        outcome.renamed,
        vec![
            ("Air_Canada_logo1.png".to_string(), "Air_Canada_Rouge_logo1.png".to_string()),
            ("Air_Canada_logo2.png".to_string(), "Air_Canada_Rouge_logo2.png".to_string()),
        ]
    );

    let batch_dir = library.root().join("54a");
    assert!(batch_dir.join("Air_Canada_Rouge_logo1.png").exists());
    assert!(!batch_dir.join("Air_Canada_logo1.png").exists());

    let groups = library.list("54a").unwrap();
    assert_eq!(brands(&groups), vec!["Air Canada Rouge"]);
}

#[test]
fn test_rename_brand_collision_changes_nothing() {
    let (_dir, library, uploads) = setup();
    let png = source_image(&uploads, "a.png");
    library.add_logo("54a", "TD", &png).unwrap();
    library.add_logo("54a", "RBC", &png).unwrap();

    let result = library.rename_brand("54a", "TD", "RBC");
    assert!(matches!(result, Err(LogoBatchError::AlreadyExists(_))));

    let batch_dir = library.root().join("54a");
    assert!(batch_dir.join("TD_logo1.png").exists());
    assert!(batch_dir.join("RBC_logo1.png").exists());
    assert_eq!(brands(&library.list("54a").unwrap()), vec!["RBC", "TD"]);
}

#[test]
fn test_rename_unknown_brand() {
    let (_dir, library, uploads) = setup();
    let png = source_image(&uploads, "a.png");
    library.add_logo("54a", "TD", &png).unwrap();

    let result = library.rename_brand("54a", "Telus", "Bell");
    assert!(matches!(result, Err(LogoBatchError::BrandNotFound(_))));
}

#[test]
fn test_delete_brand_and_logo() {
    let (_dir, library, uploads) = setup();
    let png = source_image(&uploads, "a.png");
    library.add_logo("54a", "TD", &png).unwrap();
    library.add_logo("54a", "TD", &png).unwrap();
    library.add_logo("54a", "Oreo", &png).unwrap();

    let removed = library.delete_brand("54a", "TD").unwrap();
    assert_eq!(removed, vec!["TD_logo1.png", "TD_logo2.png"]);
    assert_eq!(brands(&library.list("54a").unwrap()), vec!["Oreo"]);

    library.delete_logo("54a", "Oreo_logo1.png").unwrap();
    assert!(library.list("54a").unwrap().is_empty());
    assert!(BrandSidecar::load(&library.root().join("54a")).is_empty());

    assert!(matches!(
        library.delete_logo("54a", "Oreo_logo1.png"),
        Err(LogoBatchError::FileNotFound(_))
    ));
    assert!(matches!(
        library.delete_logo("54a", "../secret.png"),
        Err(LogoBatchError::PathEscape(_))
    ));
}

#[test]
fn test_legacy_folder_groups_by_file_name() {
    let (_dir, library, _uploads) = setup();
    let batch_dir = library.create_batch("53").unwrap();
    for name in ["Coca-Cola_3.png", "Amalie_Oil_logo2.png", "Acme.png", "Amalie_Oil_logo1.png"] {
        source_image(&batch_dir, name);
    }

    let groups = library.list("53").unwrap();
    assert_eq!(brands(&groups), vec!["Acme", "Amalie Oil", "Coca-Cola"]);
    assert_eq!(groups[1].files, vec!["Amalie_Oil_logo1.png", "Amalie_Oil_logo2.png"]);
}

#[test]
fn test_migrate_then_sidecar_overrides_file_name() {
    let (_dir, library, _uploads) = setup();
    let batch_dir = library.create_batch("53").unwrap();
    for name in ["Acme.png", "Amalie_Oil_logo1.png", "Coca-Cola_3.png"] {
        source_image(&batch_dir, name);
    }

    assert_eq!(library.migrate("53").unwrap(), (3, 0));
    assert_eq!(library.migrate("53").unwrap(), (0, 0));

    let mut sidecar = BrandSidecar::load(&batch_dir);
    sidecar.assign("Acme.png", "Amalie_Oil");
    sidecar.save(&batch_dir).unwrap();

    let groups = library.list("53").unwrap();
    assert_eq!(brands(&groups), vec!["Amalie Oil", "Coca-Cola"]);
    assert_eq!(groups[0].files, vec!["Acme.png", "Amalie_Oil_logo1.png"]);

    std::fs::remove_file(batch_dir.join("Coca-Cola_3.png")).unwrap();
    assert_eq!(library.migrate("53").unwrap(), (0, 1));
}

#[test]
fn test_list_all_batches() {
    let (_dir, library, uploads) = setup();
    let png = source_image(&uploads, "a.png");
    library.add_logo("54b", "TD", &png).unwrap();
    library.add_logo("54a", "Oreo", &png).unwrap();
    library.add_logo("54a", "Air Canada", &png).unwrap();

    let all = library.list_all().unwrap();
    let ids: Vec<&str> = all.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["54a", "54b"]);
    assert_eq!(brands(&all[0].1), vec!["Air Canada", "Oreo"]);
    assert_eq!(library.batches().unwrap(), vec!["54a", "54b"]);
}

#[test]
fn test_rename_brand_chained_targets_keep_contents() {
    let (_dir, library, _uploads) = setup();
    let batch_dir = library.create_batch("54a").unwrap();
    std::fs::write(batch_dir.join("Acme_2.png"), "variant-two").unwrap();
    std::fs::write(batch_dir.join("Acme_logo1_2.png"), "logo-one").unwrap();

    // Acme_2.png の改名先が Acme_logo1_2.png（同じグループの旧名）になる
    let outcome = library.rename_brand("54a", "Acme", "Acme logo1").unwrap();
    assert_eq!(
        outcome.renamed,
        vec![
            ("Acme_2.png".to_string(), "Acme_logo1_2.png".to_string()),
            ("Acme_logo1_2.png".to_string(), "Acme_logo1_logo1_2.png".to_string()),
        ]
    );

    let read = |name: &str| std::fs::read_to_string(batch_dir.join(name)).unwrap();
    assert_eq!(read("Acme_logo1_2.png"), "variant-two");
    assert_eq!(read("Acme_logo1_logo1_2.png"), "logo-one");
    assert!(!batch_dir.join("Acme_2.png").exists());

    let groups = library.list("54a").unwrap();
    assert_eq!(brands(&groups), vec!["Acme logo1"]);
    assert_eq!(groups[0].files.len(), 2);
}

#[test]
fn test_rename_brand_with_saved_keys_keeps_contents() {
    let (_dir, library, _uploads) = setup();
    let batch_dir = library.create_batch("54a").unwrap();
    std::fs::write(batch_dir.join("K_1.png"), "first").unwrap();
    std::fs::write(batch_dir.join("K_1_1.png"), "second").unwrap();
    let mut sidecar = BrandSidecar::load(&batch_dir);
    sidecar.assign("K_1.png", "K");
    sidecar.assign("K_1_1.png", "K");
    sidecar.save(&batch_dir).unwrap();

    library.rename_brand("54a", "K", "K_1").unwrap();

    let read = |name: &str| std::fs::read_to_string(batch_dir.join(name)).unwrap();
    assert_eq!(read("K_1_1.png"), "first");
    assert_eq!(read("K_1_1_1.png"), "second");
    assert!(!batch_dir.join("K_1.png").exists());

    let sidecar = BrandSidecar::load(&batch_dir);
    assert_eq!(sidecar.get("K_1_1.png"), Some("K_1"));
    assert_eq!(sidecar.get("K_1_1_1.png"), Some("K_1"));
    assert_eq!(sidecar.len(), 2);
}

#[test]
fn test_same_display_name_resolved_by_key() {
    let (_dir, library, _uploads) = setup();
    let batch_dir = library.create_batch("54a").unwrap();
    source_image(&batch_dir, "Air Canada_logo1.png");
    source_image(&batch_dir, "Air_Canada_logo1.png");

    let groups = library.list("54a").unwrap();
    assert_eq!(brands(&groups), vec!["Air Canada", "Air Canada"]);

    let removed = library.delete_brand("54a", "Air_Canada").unwrap();
    assert_eq!(removed, vec!["Air_Canada_logo1.png"]);

    let groups = library.list("54a").unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files, vec!["Air Canada_logo1.png"]);
}

#[test]
fn test_same_display_name_without_matching_key_is_ambiguous() {
    let (_dir, library, _uploads) = setup();
    let batch_dir = library.create_batch("54a").unwrap();
    source_image(&batch_dir, "A_B C_logo1.png");
    source_image(&batch_dir, "A B_C_logo1.png");

    assert!(matches!(
        library.delete_brand("54a", "A B C"),
        Err(LogoBatchError::AmbiguousBrand(_))
    ));
    assert!(matches!(
        library.rename_brand("54a", "A B C", "ABC"),
        Err(LogoBatchError::AmbiguousBrand(_))
    ));
    assert_eq!(library.list("54a").unwrap().len(), 2);

    library.rename_brand("54a", "A_B C", "ABC").unwrap();
    assert!(batch_dir.join("ABC_logo1.png").exists());
    assert!(batch_dir.join("A B_C_logo1.png").exists());
}
