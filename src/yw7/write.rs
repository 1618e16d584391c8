//! Writing the model back to a `.yw7` project file.
//!
//! Plot lines have no native representation in yw7: they are emitted as
//! unused chapters of type 2 carrying a `Field_ArcDefinition`, grouped
//! under a synthetic "Plot lines" part, and their plot points become
//! scenes marked with `Field_SceneType` 2.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::model::fields::list_to_string;
use crate::model::id::{create_id, strip_prefix, CHAPTER_PREFIX, SECTION_PREFIX};
use crate::model::{
    Chapter, ChapterLevel, ChapterType, Novel, Project, SceneKind, Section, SectionType,
    WordCountLog,
};
use crate::utils::fsio::write_with_backup;

use super::error::Yw7Error;
use super::is_locked;
use super::markup::novx_to_shortcode;

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

// Tag marking stage sections in yw7, which has no native stage type.
const STAGE_MARKER: &str = "stage";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Writes a yWriter 7 project file, backing up any existing target.
pub fn write_project(path: &Path, project: &mut Project) -> Result<(), Yw7Error> {
    if is_locked(path) {
        return Err(Yw7Error::Locked);
    }
    if project.novel.languages.is_none() {
        project.novel.detect_languages();
    }
    let body = build_document(&mut project.novel, &project.wc_log)?;
    let document = format!("{XML_HEADER}{body}");
    write_with_backup(path, &document).map_err(|_| Yw7Error::Write {
        path: path.display().to_string(),
    })
}

fn build_document(novel: &mut Novel, wc_log: &WordCountLog) -> Result<String, Yw7Error> {
    // Plot points are written as additional scenes; their ids and the
    // arc/association cross references must be known up front.
    let mut sc_ids = novel.tree.all_sections();
    let mut new_sc_ids: HashMap<String, String> = HashMap::new();
    for pl_id in novel.tree.plot_lines() {
        for pp_id in novel.tree.plot_points_of(pl_id) {
            let sc_id = create_id(&sc_ids, SECTION_PREFIX);
            sc_ids.push(sc_id.clone());
            new_sc_ids.insert(pp_id.clone(), sc_id);
        }
    }

    let mut sc_plot_lines: HashMap<String, Vec<String>> = HashMap::new();
    let mut sc_assoc: HashMap<String, Vec<String>> = HashMap::new();
    for pl_id in novel.tree.plot_lines() {
        let Some(plot_line) = novel.plot_lines.get(pl_id) else {
            continue;
        };
        let Some(short_name) = plot_line.short_name.clone() else {
            continue;
        };
        for sc_id in &plot_line.sections {
            sc_plot_lines
                .entry(sc_id.clone())
                .or_default()
                .push(short_name.clone());
        }
        for pp_id in novel.tree.plot_points_of(pl_id) {
            if let Some(sc_id) = new_sc_ids.get(pp_id) {
                sc_plot_lines
                    .entry(sc_id.clone())
                    .or_default()
                    .push(short_name.clone());
            }
        }
    }
    for pl_id in novel.tree.plot_lines() {
        for pp_id in novel.tree.plot_points_of(pl_id) {
            let Some(plot_point) = novel.plot_points.get(pp_id) else {
                continue;
            };
            let (Some(target), Some(pp_sc_id)) =
                (plot_point.section_assoc.clone(), new_sc_ids.get(pp_id))
            else {
                continue;
            };
            sc_assoc
                .entry(target.clone())
                .or_default()
                .push(strip_prefix(pp_sc_id).to_string());
            sc_assoc
                .entry(pp_sc_id.clone())
                .or_default()
                .push(strip_prefix(&target).to_string());
        }
    }

    let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    w.write_event(Event::Start(BytesStart::new("YWRITER7")))?;

    write_project_meta(&mut w, novel)?;
    write_world_elements(&mut w, novel, "LOCATIONS", "LOCATION", true)?;
    write_world_elements(&mut w, novel, "ITEMS", "ITEM", false)?;
    write_characters(&mut w, novel)?;
    write_project_vars(&mut w, novel)?;
    write_scenes(&mut w, novel, &new_sc_ids, &sc_plot_lines, &sc_assoc)?;
    write_chapters(&mut w, novel, &new_sc_ids)?;
    write_project_notes(&mut w, novel)?;
    write_wc_log(&mut w, novel, wc_log)?;

    w.write_event(Event::End(BytesEnd::new("YWRITER7")))?;
    let bytes = w.into_inner().into_inner();
    Ok(String::from_utf8(bytes).expect("writer produced valid UTF-8"))
}

fn write_project_meta(w: &mut XmlWriter, novel: &Novel) -> Result<(), Yw7Error> {
    w.write_event(Event::Start(BytesStart::new("PROJECT")))?;
    el_text(w, "Ver", "7")?;
    opt_cdata(w, "Title", novel.title.as_deref())?;
    opt_cdata(w, "Desc", novel.desc.as_deref())?;
    opt_cdata(w, "AuthorName", novel.author_name.as_deref())?;
    if let Some(count) = novel.word_count_start {
        el_text(w, "WordCountStart", &count.to_string())?;
    }
    if let Some(target) = novel.word_target {
        el_text(w, "WordTarget", &target.to_string())?;
    }
    w.write_event(Event::Start(BytesStart::new("Fields")))?;
    if let Some(phase) = novel.work_phase {
        el_text(w, "Field_WorkPhase", &phase.to_string())?;
    }
    flag_field(w, "Field_RenumberChapters", novel.renumber_chapters)?;
    flag_field(w, "Field_RenumberParts", novel.renumber_parts)?;
    flag_field(w, "Field_RenumberWithinParts", novel.renumber_within_parts)?;
    flag_field(w, "Field_RomanChapterNumbers", novel.roman_chapter_numbers)?;
    flag_field(w, "Field_RomanPartNumbers", novel.roman_part_numbers)?;
    opt_cdata(w, "Field_ChapterHeadingPrefix", novel.chapter_heading_prefix.as_deref())?;
    opt_cdata(w, "Field_ChapterHeadingSuffix", novel.chapter_heading_suffix.as_deref())?;
    opt_cdata(w, "Field_PartHeadingPrefix", novel.part_heading_prefix.as_deref())?;
    opt_cdata(w, "Field_PartHeadingSuffix", novel.part_heading_suffix.as_deref())?;
    opt_cdata(w, "Field_CustomGoal", novel.custom_goal.as_deref())?;
    opt_cdata(w, "Field_CustomConflict", novel.custom_conflict.as_deref())?;
    opt_cdata(w, "Field_CustomOutcome", novel.custom_outcome.as_deref())?;
    opt_cdata(w, "Field_CustomChrBio", novel.custom_chr_bio.as_deref())?;
    opt_cdata(w, "Field_CustomChrGoals", novel.custom_chr_goals.as_deref())?;
    flag_field(w, "Field_SaveWordCount", novel.save_word_count)?;
    if let Some(date) = &novel.reference_date {
        el_text(w, "Field_ReferenceDate", date)?;
    }
    w.write_event(Event::End(BytesEnd::new("Fields")))?;
    w.write_event(Event::End(BytesEnd::new("PROJECT")))?;
    Ok(())
}

fn write_world_elements(
    w: &mut XmlWriter,
    novel: &Novel,
    list_tag: &str,
    item_tag: &str,
    locations: bool,
) -> Result<(), Yw7Error> {
    w.write_event(Event::Start(BytesStart::new(list_tag)))?;
    let ids = if locations {
        novel.tree.locations()
    } else {
        novel.tree.items()
    };
    for id in ids {
        let element = if locations {
            novel.locations.get(id)
        } else {
            novel.items.get(id)
        };
        let Some(element) = element else { continue };
        w.write_event(Event::Start(BytesStart::new(item_tag)))?;
        el_text(w, "ID", strip_prefix(id))?;
        opt_cdata(w, "Title", element.title.as_deref())?;
        opt_cdata(w, "Desc", element.desc.as_deref())?;
        opt_cdata(w, "AKA", element.aka.as_deref())?;
        if !element.tags.is_empty() {
            el_cdata(w, "Tags", &list_to_string(&element.tags, ";"))?;
        }
        w.write_event(Event::End(BytesEnd::new(item_tag)))?;
    }
    w.write_event(Event::End(BytesEnd::new(list_tag)))?;
    Ok(())
}

fn write_characters(w: &mut XmlWriter, novel: &Novel) -> Result<(), Yw7Error> {
    w.write_event(Event::Start(BytesStart::new("CHARACTERS")))?;
    for cr_id in novel.tree.characters() {
        let Some(character) = novel.characters.get(cr_id) else {
            continue;
        };
        w.write_event(Event::Start(BytesStart::new("CHARACTER")))?;
        el_text(w, "ID", strip_prefix(cr_id))?;
        opt_cdata(w, "Title", character.title.as_deref())?;
        opt_cdata(w, "Desc", character.desc.as_deref())?;
        opt_cdata(w, "Notes", character.notes.as_deref())?;
        opt_cdata(w, "AKA", character.aka.as_deref())?;
        if !character.tags.is_empty() {
            el_cdata(w, "Tags", &list_to_string(&character.tags, ";"))?;
        }
        opt_cdata(w, "Bio", character.bio.as_deref())?;
        opt_cdata(w, "Goals", character.goals.as_deref())?;
        opt_cdata(w, "FullName", character.full_name.as_deref())?;
        if character.is_major {
            el_text(w, "Major", "-1")?;
        }
        if character.birth_date.is_some() || character.death_date.is_some() {
            w.write_event(Event::Start(BytesStart::new("Fields")))?;
            if let Some(date) = &character.birth_date {
                el_text(w, "Field_BirthDate", date)?;
            }
            if let Some(date) = &character.death_date {
                el_text(w, "Field_DeathDate", date)?;
            }
            w.write_event(Event::End(BytesEnd::new("Fields")))?;
        }
        w.write_event(Event::End(BytesEnd::new("CHARACTER")))?;
    }
    w.write_event(Event::End(BytesEnd::new("CHARACTERS")))?;
    Ok(())
}

/// Language and country codes travel as yWriter project variables, one
/// `lang=xx` pair per language used in the text.
fn write_project_vars(w: &mut XmlWriter, novel: &mut Novel) -> Result<(), Yw7Error> {
    let has_languages = novel.languages.as_ref().map_or(false, |l| !l.is_empty());
    if !has_languages && novel.language_code.is_none() && novel.country_code.is_none() {
        w.write_event(Event::Empty(BytesStart::new("PROJECTVARS")))?;
        return Ok(());
    }
    novel.check_locale();
    w.write_event(Event::Start(BytesStart::new("PROJECTVARS")))?;
    let mut var_ids: Vec<String> = Vec::new();
    let language = novel.language_code.clone().unwrap_or_default();
    let country = novel.country_code.clone().unwrap_or_default();
    write_project_var(w, &mut var_ids, "Language", &language)?;
    write_project_var(w, &mut var_ids, "Country", &country)?;
    for code in novel.languages.clone().unwrap_or_default() {
        write_project_var(
            w,
            &mut var_ids,
            &format!("lang={code}"),
            &format!("<HTM <SPAN LANG=\"{code}\"> /HTM>"),
        )?;
        write_project_var(w, &mut var_ids, &format!("/lang={code}"), "<HTM </SPAN> /HTM>")?;
    }
    w.write_event(Event::End(BytesEnd::new("PROJECTVARS")))?;
    Ok(())
}

fn write_project_var(
    w: &mut XmlWriter,
    var_ids: &mut Vec<String>,
    title: &str,
    desc: &str,
) -> Result<(), Yw7Error> {
    let id = create_id(var_ids, "");
    var_ids.push(id.clone());
    w.write_event(Event::Start(BytesStart::new("PROJECTVAR")))?;
    el_text(w, "ID", &id)?;
    el_cdata(w, "Title", title)?;
    el_cdata(w, "Desc", desc)?;
    el_text(w, "Tags", "0")?;
    w.write_event(Event::End(BytesEnd::new("PROJECTVAR")))?;
    Ok(())
}

fn write_scenes(
    w: &mut XmlWriter,
    novel: &Novel,
    new_sc_ids: &HashMap<String, String>,
    sc_plot_lines: &HashMap<String, Vec<String>>,
    sc_assoc: &HashMap<String, Vec<String>>,
) -> Result<(), Yw7Error> {
    w.write_event(Event::Start(BytesStart::new("SCENES")))?;
    for sc_id in novel.tree.all_sections() {
        let Some(section) = novel.sections.get(&sc_id) else {
            continue;
        };
        write_scene(w, &sc_id, section, sc_plot_lines, sc_assoc)?;
    }
    for pl_id in novel.tree.plot_lines() {
        for pp_id in novel.tree.plot_points_of(pl_id) {
            let (Some(plot_point), Some(sc_id)) =
                (novel.plot_points.get(pp_id), new_sc_ids.get(pp_id))
            else {
                continue;
            };
            w.write_event(Event::Start(BytesStart::new("SCENE")))?;
            el_text(w, "ID", strip_prefix(sc_id))?;
            opt_cdata(w, "Title", plot_point.title.as_deref())?;
            w.write_event(Event::Start(BytesStart::new("Fields")))?;
            el_text(w, "Field_SceneType", "2")?;
            opt_scene_cross_refs(w, sc_id, sc_plot_lines, sc_assoc)?;
            w.write_event(Event::End(BytesEnd::new("Fields")))?;
            opt_cdata(w, "Desc", plot_point.desc.as_deref())?;
            el_text(w, "Unused", "-1")?;
            el_text(w, "Status", "1")?;
            w.write_event(Event::Empty(BytesStart::new("SceneContent")))?;
            w.write_event(Event::End(BytesEnd::new("SCENE")))?;
        }
    }
    w.write_event(Event::End(BytesEnd::new("SCENES")))?;
    Ok(())
}

fn write_scene(
    w: &mut XmlWriter,
    sc_id: &str,
    section: &Section,
    sc_plot_lines: &HashMap<String, Vec<String>>,
    sc_assoc: &HashMap<String, Vec<String>>,
) -> Result<(), Yw7Error> {
    // yw7 encodes section types as an Unused marker plus a SceneType
    // keyword variable; stages additionally carry a "stage" tag.
    let mut tags = section.tags.clone();
    let (unused, scene_type) = match section.sc_type {
        SectionType::Normal => (false, None),
        SectionType::Unused => (true, Some("0")),
        SectionType::Stage | SectionType::Substage => {
            if !tags.iter().any(|t| t == STAGE_MARKER) {
                tags.push(STAGE_MARKER.to_string());
            }
            (true, Some("2"))
        }
    };

    w.write_event(Event::Start(BytesStart::new("SCENE")))?;
    el_text(w, "ID", strip_prefix(sc_id))?;
    opt_cdata(w, "Title", section.title.as_deref())?;
    w.write_event(Event::Start(BytesStart::new("Fields")))?;
    if let Some(code) = scene_type {
        el_text(w, "Field_SceneType", code)?;
    }
    opt_scene_cross_refs(w, sc_id, sc_plot_lines, sc_assoc)?;
    w.write_event(Event::End(BytesEnd::new("Fields")))?;
    opt_cdata(w, "Desc", section.desc.as_deref())?;
    if unused {
        el_text(w, "Unused", "-1")?;
    }
    el_text(w, "Status", &section.status.code().to_string())?;
    match section.content() {
        Some(content) if !content.is_empty() => {
            el_cdata(w, "SceneContent", &novx_to_shortcode(content)?)?;
        }
        _ => w.write_event(Event::Empty(BytesStart::new("SceneContent")))?,
    }
    opt_cdata(w, "Notes", section.notes.as_deref())?;
    if !tags.is_empty() {
        el_cdata(w, "Tags", &list_to_string(&tags, ";"))?;
    }
    if section.append_to_prev {
        el_text(w, "AppendToPrev", "-1")?;
    }

    match (&section.date, &section.time) {
        (Some(date), Some(time)) => {
            el_text(w, "SpecificDateTime", &format!("{date} {time}"))?;
            el_text(w, "SpecificDateMode", "-1")?;
        }
        _ => {
            if let Some(day) = &section.day {
                el_text(w, "Day", day)?;
            }
            if let Some(time) = &section.time {
                let mut parts = time.split(':');
                let hours = parts.next().unwrap_or("00");
                let minutes = parts.next().unwrap_or("00");
                el_text(w, "Hour", hours)?;
                el_text(w, "Minute", minutes)?;
            }
        }
    }
    if let Some(lasts) = &section.lasts_days {
        el_text(w, "LastsDays", lasts)?;
    }
    if let Some(lasts) = &section.lasts_hours {
        el_text(w, "LastsHours", lasts)?;
    }
    if let Some(lasts) = &section.lasts_minutes {
        el_text(w, "LastsMinutes", lasts)?;
    }

    if section.scene == SceneKind::Reaction {
        el_text(w, "ReactionScene", "-1")?;
    }
    opt_cdata(w, "Goal", section.goal.as_deref())?;
    opt_cdata(w, "Conflict", section.conflict.as_deref())?;
    opt_cdata(w, "Outcome", section.outcome.as_deref())?;

    write_ref_list(w, "Characters", "CharID", &section.characters)?;
    write_ref_list(w, "Locations", "LocID", &section.locations)?;
    write_ref_list(w, "Items", "ItemID", &section.items)?;
    w.write_event(Event::End(BytesEnd::new("SCENE")))?;
    Ok(())
}

fn opt_scene_cross_refs(
    w: &mut XmlWriter,
    sc_id: &str,
    sc_plot_lines: &HashMap<String, Vec<String>>,
    sc_assoc: &HashMap<String, Vec<String>>,
) -> Result<(), Yw7Error> {
    if let Some(arcs) = sc_plot_lines.get(sc_id) {
        if !arcs.is_empty() {
            el_cdata(w, "Field_SceneArcs", &list_to_string(arcs, ";"))?;
        }
    }
    if let Some(assocs) = sc_assoc.get(sc_id) {
        if !assocs.is_empty() {
            el_text(w, "Field_SceneAssoc", &list_to_string(assocs, ";"))?;
        }
    }
    Ok(())
}

fn write_ref_list(
    w: &mut XmlWriter,
    list_tag: &str,
    item_tag: &str,
    ids: &[String],
) -> Result<(), Yw7Error> {
    if ids.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new(list_tag)))?;
    for id in ids {
        el_text(w, item_tag, strip_prefix(id))?;
    }
    w.write_event(Event::End(BytesEnd::new(list_tag)))?;
    Ok(())
}

fn write_chapters(
    w: &mut XmlWriter,
    novel: &Novel,
    new_sc_ids: &HashMap<String, String>,
) -> Result<(), Yw7Error> {
    w.write_event(Event::Start(BytesStart::new("CHAPTERS")))?;
    let mut ch_ids = novel.tree.chapters().to_vec();
    for ch_id in novel.tree.chapters() {
        let Some(chapter) = novel.chapters.get(ch_id) else {
            continue;
        };
        let scene_ids: Vec<String> = novel.tree.sections_of(ch_id).to_vec();
        write_chapter(w, strip_prefix(ch_id), chapter, None, &scene_ids)?;
    }

    if !novel.tree.plot_lines().is_empty() {
        // Arc container part, then one arc chapter per plot line.
        let part_id = create_id(&ch_ids, CHAPTER_PREFIX);
        ch_ids.push(part_id.clone());
        let mut arc_part = Chapter::new();
        arc_part.title = Some("Plot lines".to_string());
        arc_part.level = ChapterLevel::Part;
        write_chapter(w, strip_prefix(&part_id), &arc_part, Some(""), &[])?;

        for pl_id in novel.tree.plot_lines() {
            let Some(plot_line) = novel.plot_lines.get(pl_id) else {
                continue;
            };
            let ch_id = create_id(&ch_ids, CHAPTER_PREFIX);
            ch_ids.push(ch_id.clone());
            let mut arc_chapter = Chapter::new();
            arc_chapter.title = plot_line.title.clone();
            arc_chapter.desc = plot_line.desc.clone();
            let scene_ids: Vec<String> = novel
                .tree
                .plot_points_of(pl_id)
                .iter()
                .filter_map(|pp_id| new_sc_ids.get(pp_id).cloned())
                .collect();
            write_chapter(
                w,
                strip_prefix(&ch_id),
                &arc_chapter,
                Some(plot_line.short_name.as_deref().unwrap_or("")),
                &scene_ids,
            )?;
        }
    }
    w.write_event(Event::End(BytesEnd::new("CHAPTERS")))?;
    Ok(())
}

/// `arc_definition` is `Some` for plot-line chapters; the empty string
/// marks the synthetic container part (which carries no definition).
fn write_chapter(
    w: &mut XmlWriter,
    num: &str,
    chapter: &Chapter,
    arc_definition: Option<&str>,
    scene_ids: &[String],
) -> Result<(), Yw7Error> {
    let is_arc = arc_definition.is_some();
    let (unused, y_type, y_chapter_type) = if is_arc {
        (true, "1", "2")
    } else if chapter.ch_type == ChapterType::Normal {
        (false, "0", "0")
    } else {
        (true, "1", "0")
    };

    w.write_event(Event::Start(BytesStart::new("CHAPTER")))?;
    el_text(w, "ID", num)?;
    opt_cdata(w, "Title", chapter.title.as_deref())?;
    opt_cdata(w, "Desc", chapter.desc.as_deref())?;
    if unused {
        el_text(w, "Unused", "-1")?;
    }
    w.write_event(Event::Start(BytesStart::new("Fields")))?;
    if !is_arc && chapter.is_trash {
        el_text(w, "Field_IsTrash", "1")?;
    }
    match arc_definition {
        Some(definition) if !definition.is_empty() => {
            el_cdata(w, "Field_ArcDefinition", definition)?;
        }
        _ => {
            if chapter.no_number {
                el_text(w, "Field_NoNumber", "1")?;
            }
        }
    }
    w.write_event(Event::End(BytesEnd::new("Fields")))?;
    if chapter.level == ChapterLevel::Part {
        el_text(w, "SectionStart", "-1")?;
    }
    el_text(w, "Type", y_type)?;
    el_text(w, "ChapterType", y_chapter_type)?;
    if !scene_ids.is_empty() {
        w.write_event(Event::Start(BytesStart::new("Scenes")))?;
        for sc_id in scene_ids {
            el_text(w, "ScID", strip_prefix(sc_id))?;
        }
        w.write_event(Event::End(BytesEnd::new("Scenes")))?;
    }
    w.write_event(Event::End(BytesEnd::new("CHAPTER")))?;
    Ok(())
}

fn write_project_notes(w: &mut XmlWriter, novel: &Novel) -> Result<(), Yw7Error> {
    if novel.tree.project_notes().is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new("PROJECTNOTES")))?;
    for pn_id in novel.tree.project_notes() {
        let Some(note) = novel.project_notes.get(pn_id) else {
            continue;
        };
        w.write_event(Event::Start(BytesStart::new("PROJECTNOTE")))?;
        el_text(w, "ID", strip_prefix(pn_id))?;
        opt_cdata(w, "Title", note.title.as_deref())?;
        opt_cdata(w, "Desc", note.desc.as_deref())?;
        w.write_event(Event::End(BytesEnd::new("PROJECTNOTE")))?;
    }
    w.write_event(Event::End(BytesEnd::new("PROJECTNOTES")))?;
    Ok(())
}

fn write_wc_log(
    w: &mut XmlWriter,
    novel: &Novel,
    wc_log: &WordCountLog,
) -> Result<(), Yw7Error> {
    if wc_log.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new("WCLog")))?;
    let mut last: Option<(&str, &str)> = None;
    for (date, entry) in wc_log.iter() {
        if novel.save_word_count {
            // Suppress runs of identical counts.
            if last == Some((entry.count.as_str(), entry.with_unused.as_str())) {
                continue;
            }
            last = Some((entry.count.as_str(), entry.with_unused.as_str()));
        }
        w.write_event(Event::Start(BytesStart::new("WC")))?;
        el_text(w, "Date", date)?;
        el_text(w, "Count", &entry.count)?;
        el_text(w, "TotalCount", &entry.with_unused)?;
        w.write_event(Event::End(BytesEnd::new("WC")))?;
    }
    w.write_event(Event::End(BytesEnd::new("WCLog")))?;
    Ok(())
}

fn el_text(w: &mut XmlWriter, tag: &str, text: &str) -> Result<(), Yw7Error> {
    w.write_event(Event::Start(BytesStart::new(tag)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn el_cdata(w: &mut XmlWriter, tag: &str, text: &str) -> Result<(), Yw7Error> {
    w.write_event(Event::Start(BytesStart::new(tag)))?;
    w.write_event(Event::CData(BytesCData::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn opt_cdata(w: &mut XmlWriter, tag: &str, text: Option<&str>) -> Result<(), Yw7Error> {
    if let Some(text) = text {
        if !text.is_empty() {
            el_cdata(w, tag, text)?;
        }
    }
    Ok(())
}

fn flag_field(w: &mut XmlWriter, tag: &str, value: bool) -> Result<(), Yw7Error> {
    if value {
        el_text(w, tag, "1")?;
    }
    Ok(())
}
