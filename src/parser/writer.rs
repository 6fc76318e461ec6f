//! Writing the document model back into a yw7 element tree.
//!
//! When the tree from the last read is available, existing elements are
//! patched in place so their position and any content the model does not
//! cover survive. Elements are created only when missing and removed only
//! when a presence flag is cleared or a custom field is emptied. Locations,
//! items, characters and project notes are the exception: their sections
//! are rebuilt in model order on every write.

use std::collections::BTreeMap;

use tracing::debug;

use crate::constants::{FORMAT_VERSION, ROOT_TAG};
use crate::models::ids::{create_id, join_list};
use crate::models::locale::system_locale;
use crate::models::{
    Chapter, ChapterLevel, Character, CustomField, KeywordVars, Novel, ProjectField, ProjectNote,
    Scene, SceneField, WorldElement,
};
use crate::parser::reader::language_tag_code;
use crate::parser::type_codec::{encode_chapter_type, encode_scene_type};
use crate::xml::patch::{child_or_insert, set_child_text, set_flag, set_optional_child_text};
use crate::xml::{Cursor, Element, InsertAt};

/// Top-level sections in the order yWriter writes them.
const SECTIONS: [&str; 8] = [
    "PROJECT",
    "LOCATIONS",
    "ITEMS",
    "CHARACTERS",
    "PROJECTNOTES",
    "PROJECTVARS",
    "SCENES",
    "CHAPTERS",
];

/// Brings derived model state up to date before a write.
///
/// - Determines the inline languages if they are still unknown.
/// - Mirrors each scene's arcs and style into its custom fields.
/// - Checks the locale when there is locale data to write, filling gaps
///   from the system locale, then from `fallback_locale`.
pub fn prepare_for_write(novel: &mut Novel, fallback_locale: Option<(String, String)>) {
    if novel.languages.is_none() {
        novel.get_languages();
    }

    for scene in novel.scenes.values_mut() {
        if let Some(arcs) = &scene.scn_arcs {
            scene.kw_vars.set(SceneField::SceneArcs, Some(arcs.clone()));
        }
        if let Some(style) = &scene.scn_style {
            scene.kw_vars.set(SceneField::SceneStyle, Some(style.clone()));
        }
    }

    if has_locale_data(novel) {
        novel.check_locale_with(system_locale().or(fallback_locale));
    }
}

fn has_locale_data(novel: &Novel) -> bool {
    let non_empty = |code: &Option<String>| code.as_deref().is_some_and(|c| !c.is_empty());
    novel.languages.as_ref().is_some_and(|l| !l.is_empty())
        || non_empty(&novel.language_code)
        || non_empty(&novel.country_code)
}

/// Writes the model into `tree`, or into a fresh `YWRITER7` tree when
/// there is none.
///
/// Call [`prepare_for_write`] first so derived fields are current.
pub fn build_element_tree(novel: &Novel, tree: Option<Element>) -> Element {
    let mut root = tree.unwrap_or_else(|| Element::new(ROOT_TAG));

    write_project(section_mut(&mut root, "PROJECT"), novel);
    write_locations(section_mut(&mut root, "LOCATIONS"), novel);
    write_items(section_mut(&mut root, "ITEMS"), novel);
    write_characters(section_mut(&mut root, "CHARACTERS"), novel);
    write_project_notes(&mut root, novel);
    if has_locale_data(novel) {
        write_project_vars(section_mut(&mut root, "PROJECTVARS"), novel);
    }
    write_scenes(section_mut(&mut root, "SCENES"), novel);
    write_chapters(section_mut(&mut root, "CHAPTERS"), novel);

    root
}

/// Returns the section named `tag`, inserting a missing one ahead of the
/// first later section the root already has.
fn section_mut<'a>(root: &'a mut Element, tag: &str) -> &'a mut Element {
    let next_section = SECTIONS
        .iter()
        .skip_while(|section| **section != tag)
        .skip(1)
        .find_map(|section| root.position(section));
    child_or_insert(root, tag, next_section.map_or(InsertAt::End, InsertAt::Index))
}

/// Writes recognized custom fields: non-empty values are set in `<Fields>`
/// (created at `at` on demand), empty or absent values are removed.
fn write_fields<F: CustomField>(element: &mut Element, vars: &KeywordVars<F>, at: InsertAt) {
    for &field in F::ALL {
        match vars.value(field) {
            Some(value) => {
                let fields = child_or_insert(element, "Fields", at);
                set_child_text(fields, field.tag(), value, InsertAt::End);
            }
            None => {
                if let Some(fields) = element.find_mut("Fields") {
                    fields.remove(field.tag());
                }
            }
        }
    }
}

fn write_project(project: &mut Element, novel: &Novel) {
    set_child_text(project, "Ver", FORMAT_VERSION, InsertAt::End);

    let mut text_fields: Vec<(String, Option<&str>)> = vec![
        ("Title".to_string(), novel.title.as_deref()),
        ("Desc".to_string(), novel.desc.as_deref()),
        ("AuthorName".to_string(), novel.author_name.as_deref()),
        ("Bio".to_string(), novel.author_bio.as_deref()),
    ];
    for (i, title) in novel.field_titles.iter().enumerate() {
        text_fields.push((format!("FieldTitle{}", i + 1), title.as_deref()));
    }
    for (tag, text) in text_fields {
        set_optional_child_text(project, &tag, text, InsertAt::End);
    }

    let word_count_start = novel.word_count_start.map(|count| count.to_string());
    set_optional_child_text(project, "WordCountStart", word_count_start.as_deref(), InsertAt::End);
    let word_target = novel.word_target.map(|count| count.to_string());
    set_optional_child_text(project, "WordTarget", word_target.as_deref(), InsertAt::End);

    // The locale lives in the project variables now.
    let mut kw_vars = novel.kw_vars.clone();
    kw_vars.set(ProjectField::LanguageCode, None);
    kw_vars.set(ProjectField::CountryCode, None);
    write_fields(project, &kw_vars, InsertAt::End);
}

/// Appends `<tag>text</tag>` when `text` is set.
fn push_optional(parent: &mut Element, tag: &str, text: Option<&str>) {
    if let Some(text) = text {
        parent.push_text(tag, text);
    }
}

fn tags_text(tags: Option<&Vec<String>>) -> Option<String> {
    tags.map(|tags| join_list(tags))
}

fn new_entity(tag: &str, id: &str) -> Element {
    let mut element = Element::new(tag);
    element.push_text("ID", id);
    element
}

fn world_element_subtree(tag: &str, id: &str, source: &WorldElement, sort_order: usize) -> Element {
    let mut element = new_entity(tag, id);
    push_optional(&mut element, "Title", source.title.as_deref());
    push_optional(&mut element, "ImageFile", source.image.as_deref());
    push_optional(&mut element, "Desc", source.desc.as_deref());
    push_optional(&mut element, "AKA", source.aka.as_deref());
    push_optional(&mut element, "Tags", tags_text(source.tags.as_ref()).as_deref());
    element.push_text("SortOrder", sort_order.to_string());
    write_fields(&mut element, &source.kw_vars, InsertAt::End);
    element
}

fn rebuild_world_section(
    section: &mut Element,
    tag: &str,
    order: &[String],
    entries: &BTreeMap<String, WorldElement>,
) {
    section.remove_all(tag);
    let mut sort_order = 0;
    for id in order {
        let Some(source) = entries.get(id) else {
            debug!("No {tag} entry for ID {id}");
            continue;
        };
        sort_order += 1;
        section.push(world_element_subtree(tag, id, source, sort_order));
    }
}

fn write_locations(section: &mut Element, novel: &Novel) {
    rebuild_world_section(section, "LOCATION", &novel.location_order, &novel.locations);
}

fn write_items(section: &mut Element, novel: &Novel) {
    rebuild_world_section(section, "ITEM", &novel.item_order, &novel.items);
}

fn character_subtree(id: &str, source: &Character, sort_order: usize) -> Element {
    let mut element = new_entity("CHARACTER", id);
    push_optional(&mut element, "Title", source.title.as_deref());
    push_optional(&mut element, "Desc", source.desc.as_deref());
    push_optional(&mut element, "ImageFile", source.image.as_deref());
    element.push_text("SortOrder", sort_order.to_string());
    push_optional(&mut element, "Notes", source.notes.as_deref());
    push_optional(&mut element, "AKA", source.aka.as_deref());
    push_optional(&mut element, "Tags", tags_text(source.tags.as_ref()).as_deref());
    push_optional(&mut element, "Bio", source.bio.as_deref());
    push_optional(&mut element, "Goals", source.goals.as_deref());
    push_optional(&mut element, "FullName", source.full_name.as_deref());
    if source.is_major {
        element.push_text("Major", "-1");
    }
    write_fields(&mut element, &source.kw_vars, InsertAt::End);
    element
}

fn write_characters(section: &mut Element, novel: &Novel) {
    section.remove_all("CHARACTER");
    let mut sort_order = 0;
    for id in &novel.character_order {
        let Some(source) = novel.characters.get(id) else {
            debug!("No CHARACTER entry for ID {id}");
            continue;
        };
        sort_order += 1;
        section.push(character_subtree(id, source, sort_order));
    }
}

fn project_note_subtree(id: &str, source: &ProjectNote, sort_order: usize) -> Element {
    let mut element = new_entity("PROJECTNOTE", id);
    push_optional(&mut element, "Title", source.title.as_deref());
    push_optional(&mut element, "Desc", source.desc.as_deref());
    element.push_text("SortOrder", sort_order.to_string());
    write_fields(&mut element, &source.kw_vars, InsertAt::End);
    element
}

/// Rebuilds `<PROJECTNOTES>`; the section is dropped when there are no notes.
fn write_project_notes(root: &mut Element, novel: &Novel) {
    let notes: Vec<(&String, &ProjectNote)> = novel
        .project_note_order
        .iter()
        .filter_map(|id| novel.project_notes.get(id).map(|note| (id, note)))
        .collect();

    if notes.is_empty() {
        root.remove("PROJECTNOTES");
        return;
    }

    let section = section_mut(root, "PROJECTNOTES");
    section.remove_all("PROJECTNOTE");
    for (i, (id, note)) in notes.into_iter().enumerate() {
        section.push(project_note_subtree(id, note, i + 1));
    }
}

/// Updates the locale variables and adds an open/close pair for every
/// inline language that has none yet.
fn write_project_vars(section: &mut Element, novel: &Novel) {
    let language_code = novel.language_code.as_deref().unwrap_or_default();
    let country_code = novel.country_code.as_deref().unwrap_or_default();

    let mut ids: Vec<String> = Vec::new();
    let mut missing_languages: Vec<&str> = novel
        .languages
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();
    let mut has_language = false;
    let mut has_country = false;

    for project_var in section.find_all_mut("PROJECTVAR") {
        if let Some(id) = project_var.find_text("ID") {
            ids.push(id.to_string());
        }
        let Some(title) = project_var.find_text("Title").map(str::to_string) else {
            continue;
        };
        match title.as_str() {
            "Language" => {
                set_child_text(project_var, "Desc", language_code, InsertAt::End);
                has_language = true;
            }
            "Country" => {
                set_child_text(project_var, "Desc", country_code, InsertAt::End);
                has_country = true;
            }
            _ => {
                if let Some(code) = language_tag_code(&title) {
                    missing_languages.retain(|language| *language != code);
                }
            }
        }
    }

    let mut add = |title: &str, desc: &str| {
        let id = create_id(&ids);
        let mut project_var = new_entity("PROJECTVAR", &id);
        project_var.push_text("Title", title);
        project_var.push_text("Desc", desc);
        project_var.push_text("Tags", "0");
        section.push(project_var);
        debug!("Added project variable {id} ({title})");
        ids.push(id);
    };

    if !has_language {
        add("Language", language_code);
    }
    if !has_country {
        add("Country", country_code);
    }
    for code in missing_languages {
        add(
            &format!("lang={code}"),
            &format!("<HTM <SPAN LANG=\"{code}\"> /HTM>"),
        );
        add(&format!("/lang={code}"), "<HTM </SPAN> /HTM>");
    }
}

/// Rewrites `<SCENES>`.
///
/// Scenes keep their position in the existing tree. New scenes follow in
/// reading order, then scenes no chapter lists. Scenes the model no longer
/// has are dropped.
fn write_scenes(section: &mut Element, novel: &Novel) {
    let mut existing: Vec<(String, Element)> = Vec::new();
    for element in section.remove_all("SCENE") {
        match element.find_text("ID").map(str::to_string) {
            Some(id) => existing.push((id, element)),
            None => debug!("Dropping SCENE without ID"),
        }
    }

    let mut order: Vec<&str> = Vec::new();
    let candidates = existing
        .iter()
        .map(|(id, _)| id.as_str())
        .chain(novel.scenes_in_order())
        .chain(novel.scenes.keys().map(String::as_str));
    for id in candidates {
        if let Some((key, _)) = novel.scenes.get_key_value(id) {
            if !order.contains(&key.as_str()) {
                order.push(key);
            }
        }
    }

    let mut existing: BTreeMap<String, Element> = existing.into_iter().collect();
    for id in order {
        let Some(scene) = novel.scenes.get(id) else { continue };
        let mut element = existing
            .remove(id)
            .unwrap_or_else(|| new_entity("SCENE", id));
        write_scene(&mut element, id, scene, novel);
        section.push(element);
    }
}

fn write_relations(element: &mut Element, list_tag: &str, id_tag: &str, ids: Option<&Vec<String>>) {
    let Some(ids) = ids else { return };
    let list = child_or_insert(element, list_tag, InsertAt::End);
    list.remove_all(id_tag);
    for id in ids {
        list.push_text(id_tag, id.as_str());
    }
}

fn write_scene(element: &mut Element, id: &str, scene: &Scene, novel: &Novel) {
    Cursor::new(1).set(element, "Title", scene.title.as_deref());

    if !element.contains("BelongsToChID") {
        if let Some(chapter_id) = novel.chapter_of(id) {
            element.push_text("BelongsToChID", chapter_id);
        }
    }

    set_optional_child_text(element, "Desc", scene.desc.as_deref(), InsertAt::End);

    match scene.content() {
        Some(content) => {
            set_child_text(element, "SceneContent", content, InsertAt::End);
        }
        None => {
            if !element.contains("SceneContent") {
                element.push(Element::new("SceneContent"));
            }
        }
    }
    set_child_text(element, "WordCount", &scene.word_count().to_string(), InsertAt::End);
    set_child_text(element, "LetterCount", &scene.letter_count().to_string(), InsertAt::End);

    let code = encode_scene_type(scene.scene_type);
    set_flag(element, "Unused", code.unused, InsertAt::End);
    let has_type_field = element
        .find("Fields")
        .is_some_and(|fields| fields.contains("Field_SceneType"));
    match code.scene_type {
        // "0" restates the Unused marker: kept current, never added.
        Some("0") if !has_type_field => {}
        Some(value) => {
            let fields = child_or_insert(element, "Fields", InsertAt::End);
            set_child_text(fields, "Field_SceneType", value, InsertAt::End);
        }
        None => {
            if let Some(fields) = element.find_mut("Fields") {
                fields.remove("Field_SceneType");
            }
        }
    }
    write_fields(element, &scene.kw_vars, InsertAt::End);

    let status = scene.status.map(|status| status.to_string());
    set_optional_child_text(element, "Status", status.as_deref(), InsertAt::End);
    set_optional_child_text(element, "Notes", scene.notes.as_deref(), InsertAt::End);
    let tags = tags_text(scene.tags.as_ref());
    set_optional_child_text(element, "Tags", tags.as_deref(), InsertAt::End);
    for (tag, text) in [
        ("Field1", &scene.field1),
        ("Field2", &scene.field2),
        ("Field3", &scene.field3),
        ("Field4", &scene.field4),
    ] {
        set_optional_child_text(element, tag, text.as_deref(), InsertAt::End);
    }
    set_flag(element, "AppendToPrev", scene.append_to_prev, InsertAt::End);

    write_date_time(element, scene);

    for (tag, text) in [
        ("LastsDays", &scene.lasts_days),
        ("LastsHours", &scene.lasts_hours),
        ("LastsMinutes", &scene.lasts_minutes),
    ] {
        set_optional_child_text(element, tag, text.as_deref(), InsertAt::End);
    }

    set_flag(element, "ReactionScene", scene.is_reaction_scene, InsertAt::End);
    set_flag(element, "SubPlot", scene.is_subplot, InsertAt::End);
    for (tag, text) in [
        ("Goal", &scene.goal),
        ("Conflict", &scene.conflict),
        ("Outcome", &scene.outcome),
        ("ImageFile", &scene.image),
    ] {
        set_optional_child_text(element, tag, text.as_deref(), InsertAt::End);
    }

    write_relations(element, "Characters", "CharID", scene.characters.as_ref());
    write_relations(element, "Locations", "LocID", scene.locations.as_ref());
    write_relations(element, "Items", "ItemID", scene.items.as_ref());

    // Obsolete since yWriter 7 keeps the text in SceneContent.
    element.remove("RTFFile");
}

/// Absolute date/time and relative day/hour/minute exclude each other.
fn write_date_time(element: &mut Element, scene: &Scene) {
    if let (Some(date), Some(time)) = (&scene.date, &scene.time) {
        let date_time = format!("{date} {time}");
        if element.contains("SpecificDateTime") {
            set_child_text(element, "SpecificDateTime", &date_time, InsertAt::End);
        } else {
            element.push_text("SpecificDateTime", date_time);
            set_child_text(element, "SpecificDateMode", "-1", InsertAt::End);
        }
        for tag in ["Day", "Hour", "Minute"] {
            element.remove(tag);
        }
    } else if scene.day.is_some() || scene.hour.is_some() || scene.minute.is_some() {
        element.remove("SpecificDateTime");
        element.remove("SpecificDateMode");
        for (tag, text) in [("Day", &scene.day), ("Hour", &scene.hour), ("Minute", &scene.minute)] {
            set_optional_child_text(element, tag, text.as_deref(), InsertAt::End);
        }
    }
}

/// Rewrites `<CHAPTERS>` in book order; chapters the model no longer has
/// are dropped.
fn write_chapters(section: &mut Element, novel: &Novel) {
    let mut existing: BTreeMap<String, Element> = BTreeMap::new();
    for element in section.remove_all("CHAPTER") {
        if let Some(id) = element.find_text("ID").map(str::to_string) {
            existing.insert(id, element);
        }
    }

    let mut sort_order = 0;
    for id in &novel.chapter_order {
        let Some(chapter) = novel.chapters.get(id) else {
            debug!("No CHAPTER entry for ID {id}");
            continue;
        };
        sort_order += 1;
        let mut element = existing
            .remove(id)
            .unwrap_or_else(|| new_entity("CHAPTER", id));
        write_chapter(&mut element, chapter, sort_order);
        section.push(element);
    }
}

/// Sets a chapter switch field to `1`, or resets an existing one to `0`.
fn write_chapter_switch(element: &mut Element, tag: &str, on: bool, at: InsertAt) {
    if on {
        let fields = child_or_insert(element, "Fields", at);
        set_child_text(fields, tag, "1", InsertAt::End);
    } else if let Some(fields) = element.find_mut("Fields") {
        if fields.contains(tag) {
            set_child_text(fields, tag, "0", InsertAt::End);
        }
    }
}

fn write_chapter(element: &mut Element, chapter: &Chapter, sort_order: usize) {
    let code = encode_chapter_type(chapter.chapter_type);
    let mut cursor = Cursor::new(1);

    cursor.set(element, "Title", chapter.title.as_deref());
    cursor.set(element, "Desc", chapter.desc.as_deref());

    set_flag(element, "Unused", code.unused, cursor.at());
    cursor.skip_if_present(element, "Unused");

    cursor.set(element, "SortOrder", Some(sort_order.to_string().as_str()));

    write_chapter_switch(element, "Field_SuppressChapterTitle", chapter.suppress_title, cursor.at());
    write_chapter_switch(element, "Field_SuppressChapterBreak", chapter.suppress_break, cursor.at());
    if chapter.is_trash {
        let fields = child_or_insert(element, "Fields", cursor.at());
        set_child_text(fields, "Field_IsTrash", "1", InsertAt::End);
    } else if let Some(fields) = element.find_mut("Fields") {
        fields.remove("Field_IsTrash");
    }
    write_fields(element, &chapter.kw_vars, cursor.at());
    cursor.skip_if_present(element, "Fields");

    set_flag(element, "SectionStart", chapter.level == ChapterLevel::Section, cursor.at());
    cursor.skip_if_present(element, "SectionStart");

    cursor.set(element, "Type", Some(code.legacy_type));
    cursor.set(element, "ChapterType", Some(code.chapter_type));

    element.remove("Scenes");
    if !chapter.scenes.is_empty() {
        let mut scenes = Element::new("Scenes");
        for scene_id in &chapter.scenes {
            scenes.push_text("ScID", scene_id.as_str());
        }
        element.insert(cursor.index(), scenes);
    }
}
