//! Reading `.yw7` project files into the model.

use std::path::Path;

use roxmltree::Node;

use crate::model::fields::string_to_list;
use crate::model::id::{
    CHAPTER_PREFIX, CHARACTER_PREFIX, ITEM_PREFIX, LOCATION_PREFIX, PLOT_LINE_PREFIX,
    PLOT_POINT_PREFIX, PRJ_NOTE_PREFIX, SECTION_PREFIX,
};
use crate::model::{
    Chapter, ChapterLevel, ChapterType, Character, Novel, PlotLine, PlotPoint, Project,
    ProjectNote, SceneKind, Section, SectionType, Status, WcEntry, WorldElement,
};
use crate::utils::fsio::read_xml_text;
use crate::xmlio::{child, child_text, parse_document};

use super::error::Yw7Error;
use super::is_locked;
use super::markup::MarkupConverter;

/// Reads a yWriter 7 project file.
pub fn read_project(path: &Path) -> Result<Project, Yw7Error> {
    if is_locked(path) {
        return Err(Yw7Error::Locked);
    }
    let text = read_xml_text(path)?;
    let doc = parse_document(&text).map_err(|e| Yw7Error::Malformed {
        message: e.to_string(),
    })?;
    let root = doc.root_element();

    let mut project = Project::new(Novel::new());
    let novel = &mut project.novel;

    read_project_meta(root, novel)?;
    read_locations(root, novel);
    read_items(root, novel);
    read_characters(root, novel);
    read_project_vars(root, novel);
    let arc_scene_ids = read_chapters(root, novel);
    read_scenes(root, novel, &arc_scene_ids);
    read_project_notes(root, novel);

    if let Some(wclog) = child(root, "WCLog") {
        for wc in wclog.children().filter(|c| c.has_tag_name("WC")) {
            let (Some(date), Some(count), Some(total)) = (
                child_text(wc, "Date"),
                child_text(wc, "Count"),
                child_text(wc, "TotalCount"),
            ) else {
                continue;
            };
            project.wc_log.insert(
                date,
                WcEntry {
                    count,
                    with_unused: total,
                },
            );
        }
    }

    project.novel.check_locale();
    Ok(project)
}

fn read_project_meta(root: Node, novel: &mut Novel) -> Result<(), Yw7Error> {
    let project = child(root, "PROJECT").ok_or_else(|| Yw7Error::MissingElement {
        tag: "PROJECT".to_string(),
    })?;
    novel.title = child_text(project, "Title");
    novel.author_name = child_text(project, "AuthorName");
    novel.desc = child_text(project, "Desc");
    novel.word_count_start = child_text(project, "WordCountStart").and_then(|t| t.parse().ok());
    novel.word_target = child_text(project, "WordTarget").and_then(|t| t.parse().ok());

    for fields in project.children().filter(|c| c.has_tag_name("Fields")) {
        novel.work_phase = child_text(fields, "Field_WorkPhase")
            .and_then(|t| t.parse().ok())
            .or(novel.work_phase);
        novel.renumber_chapters |= field_flag(fields, "Field_RenumberChapters");
        novel.renumber_parts |= field_flag(fields, "Field_RenumberParts");
        novel.renumber_within_parts |= field_flag(fields, "Field_RenumberWithinParts");
        novel.roman_chapter_numbers |= field_flag(fields, "Field_RomanChapterNumbers");
        novel.roman_part_numbers |= field_flag(fields, "Field_RomanPartNumbers");
        novel.save_word_count |= field_flag(fields, "Field_SaveWordCount");
        set_if_present(&mut novel.chapter_heading_prefix, fields, "Field_ChapterHeadingPrefix");
        set_if_present(&mut novel.chapter_heading_suffix, fields, "Field_ChapterHeadingSuffix");
        set_if_present(&mut novel.part_heading_prefix, fields, "Field_PartHeadingPrefix");
        set_if_present(&mut novel.part_heading_suffix, fields, "Field_PartHeadingSuffix");
        set_if_present(&mut novel.custom_goal, fields, "Field_CustomGoal");
        set_if_present(&mut novel.custom_conflict, fields, "Field_CustomConflict");
        set_if_present(&mut novel.custom_outcome, fields, "Field_CustomOutcome");
        set_if_present(&mut novel.custom_chr_bio, fields, "Field_CustomChrBio");
        set_if_present(&mut novel.custom_chr_goals, fields, "Field_CustomChrGoals");
        set_if_present(&mut novel.language_code, fields, "Field_LanguageCode");
        set_if_present(&mut novel.country_code, fields, "Field_CountryCode");
    }
    Ok(())
}

/// yw7 keyword-variable flags are written as "1" when set and omitted
/// otherwise; any non-empty value counts as set.
fn field_flag(fields: Node, name: &str) -> bool {
    child_text(fields, name).map_or(false, |t| !t.is_empty())
}

fn set_if_present(slot: &mut Option<String>, fields: Node, name: &str) {
    if let Some(value) = child_text(fields, name) {
        if !value.is_empty() {
            *slot = Some(value);
        }
    }
}

fn read_project_vars(root: Node, novel: &mut Novel) {
    let Some(vars) = child(root, "PROJECTVARS") else {
        return;
    };
    for var in vars.children().filter(|c| c.has_tag_name("PROJECTVAR")) {
        let Some(title) = child_text(var, "Title") else {
            continue;
        };
        if title == "Language" {
            if let Some(desc) = child_text(var, "Desc") {
                novel.language_code = Some(desc);
            }
        } else if title == "Country" {
            if let Some(desc) = child_text(var, "Desc") {
                novel.country_code = Some(desc);
            }
        } else if let Some(code) = title.strip_prefix("lang=") {
            novel
                .languages
                .get_or_insert_with(Vec::new)
                .push(code.to_string());
        }
    }
}

fn read_locations(root: Node, novel: &mut Novel) {
    let Some(locations) = child(root, "LOCATIONS") else {
        return;
    };
    for xml_loc in locations.children().filter(|c| c.has_tag_name("LOCATION")) {
        let Some(num) = child_text(xml_loc, "ID") else {
            continue;
        };
        let lc_id = format!("{LOCATION_PREFIX}{num}");
        novel.tree.add_location(&lc_id);
        novel.locations.insert(lc_id, read_world_element(xml_loc));
    }
}

fn read_items(root: Node, novel: &mut Novel) {
    let Some(items) = child(root, "ITEMS") else {
        return;
    };
    for xml_item in items.children().filter(|c| c.has_tag_name("ITEM")) {
        let Some(num) = child_text(xml_item, "ID") else {
            continue;
        };
        let it_id = format!("{ITEM_PREFIX}{num}");
        novel.tree.add_item(&it_id);
        novel.items.insert(it_id, read_world_element(xml_item));
    }
}

fn read_world_element(node: Node) -> WorldElement {
    let mut element = WorldElement::new();
    element.title = child_text(node, "Title");
    element.desc = child_text(node, "Desc");
    element.aka = child_text(node, "AKA");
    if let Some(tags) = child_text(node, "Tags") {
        element.tags = string_to_list(&tags, ';');
    }
    element
}

fn read_characters(root: Node, novel: &mut Novel) {
    let Some(characters) = child(root, "CHARACTERS") else {
        return;
    };
    for xml_crt in characters.children().filter(|c| c.has_tag_name("CHARACTER")) {
        let Some(num) = child_text(xml_crt, "ID") else {
            continue;
        };
        let cr_id = format!("{CHARACTER_PREFIX}{num}");
        let mut character = Character::new();
        character.title = child_text(xml_crt, "Title");
        character.desc = child_text(xml_crt, "Desc");
        character.aka = child_text(xml_crt, "AKA");
        if let Some(tags) = child_text(xml_crt, "Tags") {
            character.tags = string_to_list(&tags, ';');
        }
        character.notes = child_text(xml_crt, "Notes");
        character.bio = child_text(xml_crt, "Bio");
        character.goals = child_text(xml_crt, "Goals");
        character.full_name = child_text(xml_crt, "FullName");
        character.is_major = child(xml_crt, "Major").is_some();
        if let Some(fields) = child(xml_crt, "Fields") {
            character.birth_date =
                child_text(fields, "Field_BirthDate").filter(|d| !d.is_empty());
            character.death_date =
                child_text(fields, "Field_DeathDate").filter(|d| !d.is_empty());
        }
        novel.tree.add_character(&cr_id);
        novel.characters.insert(cr_id, character);
    }
}

/// Reads the CHAPTERS list. Chapters carrying an arc definition become
/// plot lines, and their scenes are earmarked as plot points; the
/// returned list holds the bare yw7 ids of those scenes.
fn read_chapters(root: Node, novel: &mut Novel) -> Vec<String> {
    let mut arc_scene_ids = Vec::new();
    let Some(chapters) = child(root, "CHAPTERS") else {
        return arc_scene_ids;
    };
    for xml_chp in chapters.children().filter(|c| c.has_tag_name("CHAPTER")) {
        let Some(num) = child_text(xml_chp, "ID") else {
            continue;
        };
        let mut chapter = Chapter::new();
        chapter.title = child_text(xml_chp, "Title");
        chapter.desc = child_text(xml_chp, "Desc");
        chapter.level = if child(xml_chp, "SectionStart").is_some() {
            ChapterLevel::Part
        } else {
            ChapterLevel::Chapter
        };

        let unused = child(xml_chp, "Unused").is_some();
        chapter.ch_type = ChapterType::Normal;
        if let Some(chapter_type) = child_text(xml_chp, "ChapterType") {
            if chapter_type == "2" || chapter_type == "1" || unused {
                chapter.ch_type = ChapterType::Unused;
            }
        } else if let Some(old_type) = child_text(xml_chp, "Type") {
            if old_type == "1" || unused {
                chapter.ch_type = ChapterType::Unused;
            }
        }

        let mut short_name = String::new();
        for fields in xml_chp.children().filter(|c| c.has_tag_name("Fields")) {
            chapter.is_trash =
                child_text(fields, "Field_IsTrash").map_or(false, |t| t == "1");
            chapter.no_number |= field_flag(fields, "Field_NoNumber");
            if let Some(name) = child_text(fields, "Field_ArcDefinition") {
                short_name = name;
            }
            // Legacy spelling wins when both are present.
            if let Some(name) = child_text(fields, "Field_Arc_Definition") {
                short_name = name;
            }
        }

        let mut scene_ids = Vec::new();
        if let Some(scenes) = child(xml_chp, "Scenes") {
            for scn in scenes.children().filter(|c| c.has_tag_name("ScID")) {
                if let Some(id) = scn.text() {
                    scene_ids.push(id.to_string());
                }
            }
        }

        if !short_name.is_empty() {
            let pl_id = format!("{PLOT_LINE_PREFIX}{num}");
            let mut plot_line = PlotLine::new();
            plot_line.title = chapter.title.clone();
            plot_line.desc = chapter.desc.clone();
            plot_line.short_name = Some(short_name);
            novel.tree.add_plot_line(&pl_id);
            for sc_num in &scene_ids {
                novel
                    .tree
                    .add_plot_point(&pl_id, &format!("{PLOT_POINT_PREFIX}{sc_num}"));
                arc_scene_ids.push(sc_num.clone());
            }
            novel.plot_lines.insert(pl_id, plot_line);
        } else {
            let ch_id = format!("{CHAPTER_PREFIX}{num}");
            novel.tree.add_chapter(&ch_id);
            for sc_num in &scene_ids {
                novel
                    .tree
                    .add_section(&ch_id, &format!("{SECTION_PREFIX}{sc_num}"));
            }
            novel.chapters.insert(ch_id, chapter);
        }
    }
    arc_scene_ids
}

fn read_scenes(root: Node, novel: &mut Novel, arc_scene_ids: &[String]) {
    let Some(scenes) = child(root, "SCENES") else {
        return;
    };
    let languages = novel.languages.clone().unwrap_or_default();
    let mut converter = MarkupConverter::new(&languages, novel.author_name.as_deref());

    for xml_scn in scenes.children().filter(|c| c.has_tag_name("SCENE")) {
        let Some(num) = child_text(xml_scn, "ID") else {
            continue;
        };
        let mut section = Section::new();
        section.title = child_text(xml_scn, "Title");
        section.desc = child_text(xml_scn, "Desc");
        if let Some(content) = child_text(xml_scn, "SceneContent") {
            section.set_content(Some(converter.to_novx(&content)));
        }

        section.sc_type = SectionType::Normal;
        let mut scene_arcs = Vec::new();
        let mut scene_assocs = Vec::new();
        let mut custom_ar = false;
        for fields in xml_scn.children().filter(|c| c.has_tag_name("Fields")) {
            if let Some(scene_type) = child_text(fields, "Field_SceneType") {
                if scene_type == "1" || scene_type == "2" {
                    section.sc_type = SectionType::Unused;
                }
            }
            if let Some(arcs) = child_text(fields, "Field_SceneArcs") {
                scene_arcs = string_to_list(&arcs, ';');
            }
            if let Some(assocs) = child_text(fields, "Field_SceneAssoc") {
                scene_assocs = string_to_list(&assocs, ';');
            }
            custom_ar |= child(fields, "Field_CustomAR").is_some();
        }

        // Attach the scene to its plot lines by arc short name.
        let sc_id = format!("{SECTION_PREFIX}{num}");
        for short_name in &scene_arcs {
            for pl_id in novel.tree.plot_lines().to_vec() {
                let Some(plot_line) = novel.plot_lines.get_mut(&pl_id) else {
                    continue;
                };
                if plot_line.short_name.as_deref() == Some(short_name.as_str()) {
                    if section.sc_type == SectionType::Normal {
                        plot_line.sections.push(sc_id.clone());
                    }
                    break;
                }
            }
        }

        section.goal = child_text(xml_scn, "Goal");
        section.conflict = child_text(xml_scn, "Conflict");
        section.outcome = child_text(xml_scn, "Outcome");

        section.scene = if custom_ar {
            SceneKind::Other
        } else if child(xml_scn, "ReactionScene").is_some() {
            SceneKind::Reaction
        } else if section.goal.is_some() || section.conflict.is_some() || section.outcome.is_some()
        {
            SceneKind::Action
        } else {
            SceneKind::NotApplicable
        };

        if child(xml_scn, "Unused").is_some() && section.sc_type == SectionType::Normal {
            section.sc_type = SectionType::Unused;
        }
        if let Some(status) = child_text(xml_scn, "Status") {
            section.status = status.parse::<u8>().map_or(Status::Outline, Status::from_code);
        }
        section.notes = child_text(xml_scn, "Notes");
        if let Some(tags) = child_text(xml_scn, "Tags") {
            section.tags = string_to_list(&tags, ';');
        }
        section.append_to_prev = child(xml_scn, "AppendToPrev").is_some();

        read_scene_date_time(xml_scn, &mut section);

        section.lasts_days = child_text(xml_scn, "LastsDays");
        section.lasts_hours = child_text(xml_scn, "LastsHours");
        section.lasts_minutes = child_text(xml_scn, "LastsMinutes");

        section.characters =
            read_scene_refs(xml_scn, "Characters", "CharID", CHARACTER_PREFIX, novel.tree.characters());
        section.locations =
            read_scene_refs(xml_scn, "Locations", "LocID", LOCATION_PREFIX, novel.tree.locations());
        section.items = read_scene_refs(xml_scn, "Items", "ItemID", ITEM_PREFIX, novel.tree.items());

        if arc_scene_ids.contains(&num) {
            let pp_id = format!("{PLOT_POINT_PREFIX}{num}");
            let mut plot_point = PlotPoint::new();
            plot_point.title = section.title.clone();
            plot_point.desc = section.desc.clone();
            if let Some(first) = scene_assocs.first() {
                plot_point.section_assoc = Some(format!("{SECTION_PREFIX}{first}"));
            }
            novel.plot_points.insert(pp_id, plot_point);
        } else {
            if let Some(pos) = section.tags.iter().position(|t| t == "stage") {
                section.sc_type = SectionType::Substage;
                section.tags.remove(pos);
            }
            novel.sections.insert(sc_id, section);
        }
    }
}

fn read_scene_date_time(xml_scn: Node, section: &mut Section) {
    if let Some(date_time) = child_text(xml_scn, "SpecificDateTime") {
        if let Some((date, time)) = parse_date_time(&date_time) {
            section.date = Some(date);
            section.time = Some(time);
        }
        return;
    }
    if let Some(day) = child_text(xml_scn, "Day") {
        if day.parse::<i64>().is_ok() {
            section.day = Some(day);
        }
    }
    let hour = child_text(xml_scn, "Hour");
    let minute = child_text(xml_scn, "Minute");
    if hour.is_some() || minute.is_some() {
        let hour = zero_pad(hour.as_deref().unwrap_or("0"));
        let minute = zero_pad(minute.as_deref().unwrap_or("0"));
        section.time = Some(format!("{hour}:{minute}:00"));
    }
}

fn parse_date_time(text: &str) -> Option<(String, String)> {
    let normalized = text.replacen('T', " ", 1);
    let parsed = chrono::NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M"))
        .ok()?;
    Some((
        parsed.format("%Y-%m-%d").to_string(),
        parsed.format("%H:%M:%S").to_string(),
    ))
}

fn zero_pad(value: &str) -> String {
    if value.len() < 2 {
        format!("0{value}")
    } else {
        value.to_string()
    }
}

fn read_scene_refs(
    xml_scn: Node,
    list_tag: &str,
    item_tag: &str,
    prefix: &str,
    known: &[String],
) -> Vec<String> {
    let mut refs = Vec::new();
    let Some(list) = child(xml_scn, list_tag) else {
        return refs;
    };
    for item in list.descendants().filter(|c| c.has_tag_name(item_tag)) {
        if let Some(num) = item.text() {
            let id = format!("{prefix}{num}");
            if known.contains(&id) {
                refs.push(id);
            }
        }
    }
    refs
}

fn read_project_notes(root: Node, novel: &mut Novel) {
    let Some(notes) = child(root, "PROJECTNOTES") else {
        return;
    };
    for xml_note in notes.children().filter(|c| c.has_tag_name("PROJECTNOTE")) {
        let Some(num) = child_text(xml_note, "ID") else {
            continue;
        };
        let pn_id = format!("{PRJ_NOTE_PREFIX}{num}");
        let mut note = ProjectNote::default();
        note.title = child_text(xml_note, "Title");
        note.desc = child_text(xml_note, "Desc");
        novel.tree.add_project_note(&pn_id);
        novel.project_notes.insert(pn_id, note);
    }
}
