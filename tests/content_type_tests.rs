//! Integration tests for scene and chapter type encoding.

mod fixtures;

use fixtures::{create_temp_project, read_file};
use ywcodec::{ContentType, Yw7File};

const NORMAL_CHAPTER: &str = "<YWRITER7>\
    <SCENES><SCENE><ID>1</ID><SceneContent>Text.</SceneContent></SCENE></SCENES>\
    <CHAPTERS><CHAPTER><ID>1</ID><Type>0</Type><ChapterType>0</ChapterType>\
    <Scenes><ScID>1</ScID></Scenes></CHAPTER></CHAPTERS></YWRITER7>";

fn read_project(path: &std::path::Path) -> Yw7File {
    let mut file = Yw7File::new(path);
    file.read().expect("project should read");
    file
}

#[test]
fn test_scene_types_round_trip() {
    for kind in ContentType::ALL {
        let (path, _temp_dir) = create_temp_project(NORMAL_CHAPTER);
        let mut file = read_project(&path);
        file.novel.scenes.get_mut("1").unwrap().scene_type = kind;
        file.write().unwrap();

        let file = read_project(&path);
        assert_eq!(file.novel.scenes["1"].scene_type, kind, "{kind:?}");
    }
}

#[test]
fn test_chapter_types_round_trip() {
    for kind in ContentType::ALL {
        let (path, _temp_dir) = create_temp_project(NORMAL_CHAPTER);
        let mut file = read_project(&path);
        file.novel.chapters.get_mut("1").unwrap().chapter_type = kind;
        file.write().unwrap();

        let file = read_project(&path);
        assert_eq!(file.novel.chapters["1"].chapter_type, kind, "{kind:?}");
        // Scenes follow a non-normal chapter.
        assert_eq!(file.novel.scenes["1"].scene_type, kind, "{kind:?}");
    }
}

#[test]
fn test_scene_encoding_table() {
    let (path, _temp_dir) = create_temp_project(NORMAL_CHAPTER);
    let mut file = read_project(&path);

    file.novel.scenes.get_mut("1").unwrap().scene_type = ContentType::Todo;
    file.write().unwrap();
    let text = read_file(&path);
    assert!(text.contains("<Unused>-1</Unused>"));
    assert!(text.contains("<Field_SceneType>2</Field_SceneType>"));

    file.novel.scenes.get_mut("1").unwrap().scene_type = ContentType::Unused;
    file.write().unwrap();
    let text = read_file(&path);
    assert!(text.contains("<Unused>-1</Unused>"));
    assert!(text.contains("<Field_SceneType>0</Field_SceneType>"));

    file.novel.scenes.get_mut("1").unwrap().scene_type = ContentType::Normal;
    file.write().unwrap();
    let text = read_file(&path);
    assert!(!text.contains("<Unused>"));
    assert!(!text.contains("Field_SceneType"));
}

#[test]
fn test_legacy_unused_scene_keeps_marker_only() {
    let (path, _temp_dir) = create_temp_project(
        "<YWRITER7><SCENES><SCENE><ID>1</ID><Unused/></SCENE></SCENES></YWRITER7>",
    );
    let mut file = read_project(&path);
    assert_eq!(file.novel.scenes["1"].scene_type, ContentType::Unused);
    assert_eq!(file.novel.scenes["1"].scene_type.ordinal(), 3);

    file.write().unwrap();

    let text = read_file(&path);
    assert!(text.contains("<Unused>-1</Unused>"));
    assert!(!text.contains("Field_SceneType"));
}

#[test]
fn test_chapter_encoding_table() {
    let (path, _temp_dir) = create_temp_project(NORMAL_CHAPTER);
    let mut file = read_project(&path);

    let cases = [
        (ContentType::Normal, false, "0", "0"),
        (ContentType::Notes, true, "1", "1"),
        (ContentType::Todo, true, "1", "2"),
        (ContentType::Unused, true, "1", "0"),
    ];
    for (kind, unused, legacy_type, chapter_type) in cases {
        file.novel.chapters.get_mut("1").unwrap().chapter_type = kind;
        file.write().unwrap();

        let chapter = file.tree().unwrap().find("CHAPTERS").unwrap().find("CHAPTER").unwrap();
        assert_eq!(chapter.contains("Unused"), unused, "{kind:?}");
        assert_eq!(chapter.find_text("Type"), Some(legacy_type), "{kind:?}");
        assert_eq!(chapter.find_text("ChapterType"), Some(chapter_type), "{kind:?}");
    }
}

#[test]
fn test_legacy_chapter_type_without_modern_field() {
    let (path, _temp_dir) = create_temp_project(
        "<YWRITER7><SCENES><SCENE><ID>1</ID></SCENE><SCENE><ID>2</ID></SCENE></SCENES><CHAPTERS>\
         <CHAPTER><ID>1</ID><Type>1</Type><Scenes><ScID>1</ScID></Scenes></CHAPTER>\
         <CHAPTER><ID>2</ID><Type>0</Type><Unused>-1</Unused><Scenes><ScID>2</ScID></Scenes></CHAPTER>\
         </CHAPTERS></YWRITER7>",
    );
    let file = read_project(&path);

    assert_eq!(file.novel.chapters["1"].chapter_type, ContentType::Notes);
    assert_eq!(file.novel.chapters["2"].chapter_type, ContentType::Unused);
    assert_eq!(file.novel.scenes["1"].scene_type, ContentType::Notes);
    assert_eq!(file.novel.scenes["2"].scene_type, ContentType::Unused);
}

#[test]
fn test_todo_chapter_overrides_scene_type() {
    let (path, _temp_dir) = create_temp_project(
        "<YWRITER7><SCENES><SCENE><ID>1</ID><Unused>-1</Unused>\
         <Fields><Field_SceneType>1</Field_SceneType></Fields></SCENE></SCENES>\
         <CHAPTERS><CHAPTER><ID>1</ID><Unused>-1</Unused><Type>1</Type><ChapterType>2</ChapterType>\
         <Scenes><ScID>1</ScID></Scenes></CHAPTER></CHAPTERS></YWRITER7>",
    );
    let mut file = read_project(&path);
    assert_eq!(file.novel.scenes["1"].scene_type, ContentType::Todo);

    file.write().unwrap();

    assert!(read_file(&path).contains("<Field_SceneType>2</Field_SceneType>"));
}
