//! Reading yw7 project files into the document model.
//!
//! Every section is optional. A missing element leaves the model field at
//! its default; entities without an `ID` are skipped. Only an unreadable,
//! malformed or locked file is an error.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::file::guard;
use crate::models::ids::split_list;
use crate::models::{
    Chapter, ChapterLevel, Character, CustomField, KeywordVars, Novel, ProjectField, ProjectNote,
    Scene, SceneField, WorldElement,
};
use crate::parser::type_codec::{decode_chapter_type, decode_scene_type};
use crate::xml::Element;

/// Parses a yw7 project file.
///
/// Returns the model together with the parsed tree, which the writer patches
/// on the next save.
///
/// # Errors
///
/// Returns errors for:
/// - A `.lock` file next to the project (yWriter has it open)
/// - File not found or not readable
/// - Malformed XML
pub fn parse_yw7(path: &Path) -> Result<(Novel, Element)> {
    guard::ensure_unlocked(path)?;

    let xml = fs::read_to_string(path)
        .with_context(|| format!("Can not process file: {}", path.display()))?;

    let (novel, root) = parse_yw7_str(&xml)
        .with_context(|| format!("Can not process file: {}", path.display()))?;

    info!(
        "Read {} ({} chapters, {} scenes)",
        path.display(),
        novel.chapters.len(),
        novel.scenes.len()
    );
    Ok((novel, root))
}

/// Parses yw7 XML from a string.
pub fn parse_yw7_str(xml: &str) -> Result<(Novel, Element)> {
    let root = Element::parse(xml)?;
    let novel = read_novel(&root);
    Ok((novel, root))
}

/// Builds the document model from a parsed project tree.
///
/// Sections are read in dependency order: scenes filter their references
/// against the characters, locations and items already read, chapters
/// against the scenes.
pub fn read_novel(root: &Element) -> Novel {
    let mut novel = Novel::new();

    if let Some(project) = root.find("PROJECT") {
        read_project(project, &mut novel);
    }
    read_locations(root, &mut novel);
    read_items(root, &mut novel);
    read_characters(root, &mut novel);
    if let Some(project_vars) = root.find("PROJECTVARS") {
        read_project_vars(project_vars, &mut novel);
    }
    if let Some(project_notes) = root.find("PROJECTNOTES") {
        read_project_notes(project_notes, &mut novel);
    }
    read_scenes(root, &mut novel);
    read_chapters(root, &mut novel);

    novel.adjust_scene_types();

    for scene in novel.scenes.values_mut() {
        scene.scn_arcs = scene.kw_vars.get(SceneField::SceneArcs).map(str::to_string);
        scene.scn_style = scene.kw_vars.get(SceneField::SceneStyle).map(str::to_string);
    }

    novel
}

fn text_of(parent: &Element, tag: &str) -> Option<String> {
    parent.find_text(tag).map(str::to_string)
}

/// Reads `<Tags>`; a list holding only separators counts as no tags.
fn tags_of(parent: &Element) -> Option<Vec<String>> {
    parent
        .find_text("Tags")
        .map(split_list)
        .filter(|tags| !tags.is_empty())
}

fn id_of(element: &Element) -> Option<String> {
    let id = text_of(element, "ID");
    if id.is_none() {
        debug!("Skipping <{}> without ID", element.name);
    }
    id
}

/// Overlays the values of every `<Fields>` container on `vars`.
fn read_fields<F: CustomField>(element: &Element, vars: &mut KeywordVars<F>) {
    for fields in element.find_all("Fields") {
        for &field in F::ALL {
            if let Some(value) = fields.find(field.tag()) {
                vars.set(field, value.text().map(str::to_string));
            }
        }
    }
}

fn read_project(project: &Element, novel: &mut Novel) {
    novel.title = text_of(project, "Title");
    novel.author_name = text_of(project, "AuthorName");
    novel.author_bio = text_of(project, "Bio");
    novel.desc = text_of(project, "Desc");
    for (i, field_title) in novel.field_titles.iter_mut().enumerate() {
        *field_title = text_of(project, &format!("FieldTitle{}", i + 1));
    }

    // A count that is not a number reads as zero.
    let count = |tag: &str| {
        project
            .find(tag)
            .map(|element| element.text().and_then(|t| t.trim().parse::<u32>().ok()).unwrap_or(0))
    };
    novel.word_count_start = count("WordCountStart");
    novel.word_target = count("WordTarget");

    read_fields(project, &mut novel.kw_vars);

    // Written by yWriter 7.6 to 7.10
    if let Some(language) = novel.kw_vars.value(ProjectField::LanguageCode) {
        novel.language_code = Some(language.to_string());
    }
    if let Some(country) = novel.kw_vars.value(ProjectField::CountryCode) {
        novel.country_code = Some(country.to_string());
    }
}

fn read_world_element(element: &Element) -> WorldElement {
    let mut world_element = WorldElement {
        title: text_of(element, "Title"),
        image: text_of(element, "ImageFile"),
        desc: text_of(element, "Desc"),
        aka: text_of(element, "AKA"),
        tags: tags_of(element),
        ..WorldElement::default()
    };
    read_fields(element, &mut world_element.kw_vars);
    world_element
}

fn read_locations(root: &Element, novel: &mut Novel) {
    for location in root.descendants("LOCATION") {
        let Some(id) = id_of(location) else { continue };
        novel.locations.insert(id.clone(), read_world_element(location));
        novel.location_order.push(id);
    }
    debug!("Read {} locations", novel.location_order.len());
}

fn read_items(root: &Element, novel: &mut Novel) {
    for item in root.descendants("ITEM") {
        let Some(id) = id_of(item) else { continue };
        novel.items.insert(id.clone(), read_world_element(item));
        novel.item_order.push(id);
    }
    debug!("Read {} items", novel.item_order.len());
}

fn read_characters(root: &Element, novel: &mut Novel) {
    for element in root.descendants("CHARACTER") {
        let Some(id) = id_of(element) else { continue };
        let mut character = Character {
            title: text_of(element, "Title"),
            image: text_of(element, "ImageFile"),
            desc: text_of(element, "Desc"),
            aka: text_of(element, "AKA"),
            tags: tags_of(element),
            notes: text_of(element, "Notes"),
            bio: text_of(element, "Bio"),
            goals: text_of(element, "Goals"),
            full_name: text_of(element, "FullName"),
            is_major: element.contains("Major"),
            ..Character::default()
        };
        read_fields(element, &mut character.kw_vars);
        novel.characters.insert(id.clone(), character);
        novel.character_order.push(id);
    }
    debug!("Read {} characters", novel.character_order.len());
}

/// Reads the locale and the inline language tags.
///
/// Entries without a title, or with a title this codec does not use, are
/// ignored.
fn read_project_vars(project_vars: &Element, novel: &mut Novel) {
    for project_var in &project_vars.children {
        let Some(title) = project_var.find_text("Title") else {
            continue;
        };
        match title {
            "Language" => {
                if let Some(desc) = project_var.find("Desc") {
                    novel.language_code = desc.text().map(str::to_string);
                }
            }
            "Country" => {
                if let Some(desc) = project_var.find("Desc") {
                    novel.country_code = desc.text().map(str::to_string);
                }
            }
            _ => {
                let Some(code) = language_tag_code(title) else {
                    continue;
                };
                let languages = novel.languages.get_or_insert_with(Vec::new);
                if !languages.iter().any(|known| known == code) {
                    languages.push(code.to_string());
                }
            }
        }
    }
}

/// Returns `xx` for a project variable titled `lang=xx`.
pub(crate) fn language_tag_code(title: &str) -> Option<&str> {
    title
        .strip_prefix("lang=")
        .filter(|code| !code.contains('='))
}

/// Reads project notes. Any child with an `ID` counts as a note.
fn read_project_notes(project_notes: &Element, novel: &mut Novel) {
    for element in &project_notes.children {
        let Some(id) = id_of(element) else { continue };
        let mut note = ProjectNote {
            title: text_of(element, "Title"),
            desc: text_of(element, "Desc"),
            ..ProjectNote::default()
        };
        read_fields(element, &mut note.kw_vars);
        novel.project_notes.insert(id.clone(), note);
        novel.project_note_order.push(id);
    }
    debug!("Read {} project notes", novel.project_note_order.len());
}

/// Collects the referenced IDs known to `known`; `None` if none survive.
fn read_references(
    scene: &Element,
    list_tag: &str,
    id_tag: &str,
    known: &[String],
) -> Option<Vec<String>> {
    let list = scene.find(list_tag)?;
    let mut ids: Option<Vec<String>> = None;
    for reference in list.descendants(id_tag) {
        let Some(id) = reference.text() else { continue };
        if known.iter().any(|k| k == id) {
            ids.get_or_insert_with(Vec::new).push(id.to_string());
        } else {
            debug!("Dropping dangling reference {id_tag}={id}");
        }
    }
    ids
}

fn read_scenes(root: &Element, novel: &mut Novel) {
    for element in root.descendants("SCENE") {
        let Some(id) = id_of(element) else { continue };
        let mut scene = Scene::new();

        scene.title = text_of(element, "Title");
        scene.desc = text_of(element, "Desc");
        scene.set_content(text_of(element, "SceneContent"));

        read_fields(element, &mut scene.kw_vars);
        let scene_type_field = element
            .find_all("Fields")
            .find_map(|fields| fields.find("Field_SceneType"))
            .map(|field| field.text().unwrap_or_default());
        scene.scene_type = decode_scene_type(scene_type_field, element.contains("Unused"));

        scene.do_not_export =
            element.contains("ExportCondSpecific") && !element.contains("ExportWhenRTF");

        scene.status = element
            .find_text("Status")
            .and_then(|status| status.trim().parse().ok());
        scene.notes = text_of(element, "Notes");
        scene.tags = tags_of(element);
        scene.field1 = text_of(element, "Field1");
        scene.field2 = text_of(element, "Field2");
        scene.field3 = text_of(element, "Field3");
        scene.field4 = text_of(element, "Field4");
        scene.append_to_prev = element.contains("AppendToPrev");

        if let Some(date_time) = element.find("SpecificDateTime") {
            for part in date_time.text().unwrap_or_default().split(' ') {
                if part.contains('-') {
                    scene.date = Some(part.to_string());
                } else if part.contains(':') {
                    scene.time = Some(part.to_string());
                }
            }
        } else {
            scene.day = text_of(element, "Day");
            scene.hour = text_of(element, "Hour");
            scene.minute = text_of(element, "Minute");
        }

        scene.lasts_days = text_of(element, "LastsDays");
        scene.lasts_hours = text_of(element, "LastsHours");
        scene.lasts_minutes = text_of(element, "LastsMinutes");
        scene.is_reaction_scene = element.contains("ReactionScene");
        scene.is_subplot = element.contains("SubPlot");
        scene.goal = text_of(element, "Goal");
        scene.conflict = text_of(element, "Conflict");
        scene.outcome = text_of(element, "Outcome");
        scene.image = text_of(element, "ImageFile");

        scene.characters = read_references(element, "Characters", "CharID", &novel.character_order);
        scene.locations = read_references(element, "Locations", "LocID", &novel.location_order);
        scene.items = read_references(element, "Items", "ItemID", &novel.item_order);

        novel.scenes.insert(id, scene);
    }
    debug!("Read {} scenes", novel.scenes.len());
}

fn read_chapters(root: &Element, novel: &mut Novel) {
    for element in root.descendants("CHAPTER") {
        let Some(id) = id_of(element) else { continue };
        let mut chapter = Chapter::new();

        chapter.title = text_of(element, "Title");
        chapter.desc = text_of(element, "Desc");
        chapter.level = if element.contains("SectionStart") {
            ChapterLevel::Section
        } else {
            ChapterLevel::Chapter
        };

        let present = |tag: &str| element.find(tag).map(|e| e.text().unwrap_or_default());
        chapter.chapter_type = decode_chapter_type(
            present("ChapterType"),
            present("Type"),
            element.contains("Unused"),
        );

        chapter.suppress_title = chapter
            .title
            .as_deref()
            .is_some_and(|title| title.starts_with('@'));
        for fields in element.find_all("Fields") {
            let is_one = |tag: &str| fields.find_text(tag) == Some("1");
            if is_one("Field_SuppressChapterTitle") {
                chapter.suppress_title = true;
            }
            chapter.is_trash = is_one("Field_IsTrash");
            chapter.suppress_break = is_one("Field_SuppressChapterBreak");
        }
        read_fields(element, &mut chapter.kw_vars);

        if let Some(scenes) = element.find("Scenes") {
            for scene_id in scenes.find_all("ScID").filter_map(Element::text) {
                if novel.scenes.contains_key(scene_id) {
                    chapter.scenes.push(scene_id.to_string());
                } else {
                    debug!("Chapter {id} drops unknown scene {scene_id}");
                }
            }
        }

        novel.chapters.insert(id.clone(), chapter);
        novel.chapter_order.push(id);
    }
    debug!("Read {} chapters", novel.chapter_order.len());
}
