use storyvault_core::db::open_db_in_memory;
use storyvault_core::{
    import_project, ArchiveConfig, ArchiveService, ArchiveServiceError, Chapter, Note,
    NoteCategory, Project, ProjectRepository, ProjectStatus, RepoError, SequentialIdGenerator,
    SqliteProjectRepository,
};

fn tagged_project(ids: &mut SequentialIdGenerator) -> Project {
    let mut project = Project::new(ids, "Harbor Lights", "K. Lee");
    project.description = "A quiet port story.".to_string();
    project.status = ProjectStatus::Completed;
    project.chapters = vec![
        Chapter::new(ids, "Fog", "The fog rolled in.", Some("Arrival".to_string())),
        Chapter::new(ids, "Bell", "The bell rang twice.", None),
    ];
    let mut keeper = Note::new(ids, NoteCategory::Character, "Keeper", "Old", "Tends the light.");
    keeper.tags = vec!["main".to_string(), "harbor".to_string()];
    project.notes = vec![
        keeper,
        Note::new(ids, NoteCategory::Idea, "Ghost ship", "Maybe", "Sails at night."),
    ];
    project
}

#[test]
fn insert_then_get_round_trips_whole_project() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteProjectRepository::new(&mut conn);
    let mut ids = SequentialIdGenerator::default();
    let project = tagged_project(&mut ids);

    let id = repo.insert_project(&project).unwrap();
    assert_eq!(id, project.id);

    let loaded = repo.get_project(id).unwrap().unwrap();
    assert_eq!(loaded, project);
}

#[test]
fn inserting_same_project_twice_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteProjectRepository::new(&mut conn);
    let mut ids = SequentialIdGenerator::default();
    let project = tagged_project(&mut ids);

    repo.insert_project(&project).unwrap();
    let err = repo.insert_project(&project).unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(id) if id == project.id));
    assert_eq!(repo.list_projects().unwrap().len(), 1);
}

#[test]
fn list_projects_reports_counts() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteProjectRepository::new(&mut conn);
    let mut ids = SequentialIdGenerator::default();
    let project = tagged_project(&mut ids);
    repo.insert_project(&project).unwrap();

    let summaries = repo.list_projects().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, project.id);
    assert_eq!(summaries[0].title, "Harbor Lights");
    assert_eq!(summaries[0].status, ProjectStatus::Completed);
    assert_eq!(summaries[0].chapter_count, 2);
    assert_eq!(summaries[0].note_count, 2);
}

#[test]
fn service_exports_stored_project_and_imports_it_as_new() {
    let mut conn = open_db_in_memory().unwrap();
    let mut ids = SequentialIdGenerator::default();
    let original = tagged_project(&mut ids);
    SqliteProjectRepository::new(&mut conn)
        .insert_project(&original)
        .unwrap();

    let mut service = ArchiveService::new(
        SqliteProjectRepository::new(&mut conn),
        SequentialIdGenerator::starting_after(500),
        ArchiveConfig::default(),
    )
    .unwrap();

    let archive = service.export(original.id).unwrap();
    assert_eq!(archive.file_name, "Harbor Lights_archive.zip");

    let imported = service.import(&archive.bytes).unwrap();
    assert_ne!(imported.id, original.id);
    assert_eq!(imported.title, original.title);
    assert_eq!(imported.status, ProjectStatus::Serializing);
    assert_eq!(imported.chapters.len(), 2);
    assert_eq!(imported.chapters[1].content, "The bell rang twice.");

    let stored = service.repo().get_project(imported.id).unwrap().unwrap();
    assert_eq!(stored, imported);
    assert_eq!(service.repo().list_projects().unwrap().len(), 2);
}

#[test]
fn importing_same_archive_twice_creates_two_projects() {
    let mut conn = open_db_in_memory().unwrap();
    let mut ids = SequentialIdGenerator::default();
    let archive = storyvault_core::export_project(
        &tagged_project(&mut ids),
        &ArchiveConfig::default(),
    )
    .unwrap();

    let mut service = ArchiveService::new(
        SqliteProjectRepository::new(&mut conn),
        SequentialIdGenerator::starting_after(500),
        ArchiveConfig::default(),
    )
    .unwrap();

    let first = service.import(&archive.bytes).unwrap();
    let second = service.import(&archive.bytes).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(service.repo().list_projects().unwrap().len(), 2);
}

#[test]
fn imported_project_uses_config_defaults() {
    let config = ArchiveConfig {
        default_author: "Anonymous".to_string(),
        default_cover: "paper".to_string(),
        ..ArchiveConfig::default()
    };
    let mut ids = SequentialIdGenerator::default();
    let archive = storyvault_core::export_project(&tagged_project(&mut ids), &config).unwrap();

    let imported = import_project(&archive.bytes, &config, &mut ids).unwrap();
    assert_eq!(imported.author, "Anonymous");
    assert_eq!(imported.cover, "paper");
    assert_eq!(imported.description, "");
    assert!(imported.notes.iter().all(|note| note.tags.is_empty()));
}

#[test]
fn export_of_missing_project_reports_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let service = ArchiveService::new(
        SqliteProjectRepository::new(&mut conn),
        SequentialIdGenerator::default(),
        ArchiveConfig::default(),
    )
    .unwrap();

    let missing = uuid_like(42);
    let err = service.export(missing).unwrap_err();
    assert!(matches!(err, ArchiveServiceError::ProjectNotFound(_)));
}

fn uuid_like(value: u128) -> storyvault_core::ProjectId {
    storyvault_core::ProjectId::from_u128(value)
}
