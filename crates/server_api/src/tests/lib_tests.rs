use super::*;
use shared::domain::{ArtifactRead, FILE_NOT_FOUND_TEXT, SELECT_PROMPT_TEXT};

fn setup(root: &std::path::Path) -> DashboardContext {
    let layout = ArtifactLayout::new(
        root.join("transcriptsource"),
        root.join("transcriptprocessed"),
        root.join("transcriptsummary"),
    );
    for dir in [&layout.source_dir, &layout.processed_dir, &layout.summary_dir] {
        std::fs::create_dir_all(dir).expect("mkdir");
    }
    DashboardContext::new(Catalog::synthetic(20), layout)
}

fn write_example_0005(ctx: &DashboardContext) {
    let layout = &ctx.layout;
    std::fs::write(layout.source_dir.join("Example-0005.csv"), "raw,text").expect("write");
    std::fs::write(layout.processed_dir.join("Example-0005.txt"), "clean text").expect("write");
    std::fs::write(layout.summary_dir.join("Example-0005.txt"), "a summary").expect("write");
}

#[test]
fn catalog_listing_preserves_row_order() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    let entries = list_catalog(&ctx);
    assert_eq!(entries.len(), 20);
    assert_eq!(entries[0].row, 0);
    assert_eq!(entries[0].identifier.as_str(), "Example-0000");
    assert_eq!(entries[19].identifier.as_str(), "Example-0019");
}

#[tokio::test]
async fn no_selection_shows_prompt_everywhere() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    let state = select_row(&ctx, None).await;
    assert!(state.is_idle());
    for kind in ArtifactKind::ALL {
        assert_eq!(state.region(kind), SELECT_PROMPT_TEXT);
    }
}

#[tokio::test]
async fn selection_with_no_files_shows_not_found_everywhere() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    let state = select_row(&ctx, Some(0)).await;

    let selection = state.selection.as_ref().expect("selection");
    assert_eq!(selection.row, 0);
    assert_eq!(selection.identifier.as_str(), "Example-0000");
    for kind in ArtifactKind::ALL {
        assert_eq!(state.region(kind), FILE_NOT_FOUND_TEXT);
    }
}

#[tokio::test]
async fn selection_routes_each_artifact_to_its_own_region() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    write_example_0005(&ctx);

    let state = select_row(&ctx, Some(5)).await;
    assert_eq!(state.source, "raw,text");
    assert_eq!(state.processed, "clean text");
    assert_eq!(state.summary, "a summary");
}

#[tokio::test]
async fn one_missing_artifact_does_not_affect_the_others() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    write_example_0005(&ctx);
    std::fs::remove_file(ctx.layout.processed_dir.join("Example-0005.txt")).expect("remove");

    let state = select_row(&ctx, Some(5)).await;
    assert_eq!(state.source, "raw,text");
    assert_eq!(state.processed, FILE_NOT_FOUND_TEXT);
    assert_eq!(state.summary, "a summary");
}

#[tokio::test]
async fn out_of_range_row_falls_back_to_idle() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    let state = select_row(&ctx, Some(21)).await;
    assert_eq!(state, DisplayState::idle());

    let state = select_row(&ctx, Some(20)).await;
    assert!(state.is_idle());
}

#[tokio::test]
async fn each_selection_rereads_the_filesystem() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    let summary_path = ctx.layout.summary_dir.join("Example-0002.txt");

    assert_eq!(select_row(&ctx, Some(2)).await.summary, FILE_NOT_FOUND_TEXT);
    std::fs::write(&summary_path, "first draft").expect("write");
    assert_eq!(select_row(&ctx, Some(2)).await.summary, "first draft");
    std::fs::write(&summary_path, "second draft").expect("write");
    assert_eq!(select_row(&ctx, Some(2)).await.summary, "second draft");
}

#[tokio::test]
async fn load_artifact_reports_path_and_outcome() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    write_example_0005(&ctx);

    let id = Identifier::from("Example-0005");
    let payload = load_artifact(&ctx, &id, ArtifactKind::Source)
        .await
        .expect("payload");
    assert_eq!(payload.path, ctx.layout.source_dir.join("Example-0005.csv"));
    assert_eq!(payload.outcome, ArtifactRead::Content("raw,text".into()));

    let missing = load_artifact(&ctx, &Identifier::from("Example-0006"), ArtifactKind::Summary)
        .await
        .expect("payload");
    assert_eq!(missing.outcome, ArtifactRead::NotFound);
}

#[tokio::test]
async fn load_artifact_rejects_identifiers_outside_catalog() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    let err = load_artifact(&ctx, &Identifier::from("../secrets"), ArtifactKind::Source)
        .await
        .expect_err("should fail");
    assert!(matches!(err.code, ErrorCode::NotFound));
}

#[tokio::test]
async fn session_moves_from_idle_to_displaying_and_stays_there() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    write_example_0005(&ctx);
    let mut session = DashboardSession::new(ctx);
    assert!(session.state().is_idle());

    assert!(session.select(None).await.is_idle());

    let state = session.select(Some(5)).await.clone();
    assert_eq!(state.summary, "a summary");

    // Clearing the table selection keeps the last display.
    assert_eq!(session.select(None).await, &state);

    let state = session.select(Some(1)).await;
    assert_eq!(
        state.selection.as_ref().map(|s| s.identifier.as_str()),
        Some("Example-0001")
    );
    assert_eq!(state.source, FILE_NOT_FOUND_TEXT);
}

#[tokio::test]
async fn session_survives_out_of_range_selection() {
    let root = tempfile::tempdir().expect("tempdir");
    let ctx = setup(root.path());
    write_example_0005(&ctx);
    let mut session = DashboardSession::new(ctx);

    session.select(Some(5)).await;
    assert!(session.select(Some(21)).await.is_idle());
    assert_eq!(session.select(Some(5)).await.processed, "clean text");
}
