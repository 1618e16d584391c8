//! Reading `.novx` project files into the model.

use std::path::Path;

use chrono::{DateTime, Local};
use roxmltree::Node;

use crate::model::fields::{
    intersection, string_to_list, verified_date, verified_int_string, verified_time,
};
use crate::model::id::{
    has_prefix, CHAPTER_PREFIX, CHARACTER_PREFIX, ITEM_PREFIX, LOCATION_PREFIX, PLOT_LINE_PREFIX,
    PLOT_POINT_PREFIX, PRJ_NOTE_PREFIX, SECTION_PREFIX,
};
use crate::model::{
    Chapter, ChapterLevel, Character, Link, Novel, PlotLine, PlotPoint, Project, ProjectNote,
    SceneKind, Section, SectionType, Status, WcEntry, WorldElement,
};
use crate::utils::fsio::read_xml_text;
use crate::xmlio::{child, child_text, inner_xml, paragraphs_to_text, parse_document};

use super::error::NovxError;
use super::{MAJOR_VERSION, MINOR_VERSION};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Reads a novelibre project file.
pub fn read_project(path: &Path) -> Result<Project, NovxError> {
    let display = path.display().to_string();
    let text = read_xml_text(path)?;
    let doc = parse_document(&text).map_err(|e| NovxError::Malformed {
        message: e.to_string(),
    })?;
    let root = doc.root_element();
    check_version(root, &display)?;

    let mut project = Project::new(Novel::new());
    if let Some(locale) = root.attribute((XML_NS, "lang")) {
        if let Some((language, country)) = locale.split_once('-') {
            project.novel.language_code = Some(language.to_string());
            project.novel.country_code = Some(country.to_string());
        }
    }

    read_content(root, &mut project).map_err(|message| NovxError::Corrupt { message })?;
    project.novel.adjust_section_types();
    queue_word_count_update(path, &mut project);
    Ok(project)
}

fn check_version(root: Node, path: &str) -> Result<(), NovxError> {
    if root.tag_name().name() != "novx" {
        return Err(NovxError::BadRoot {
            path: path.to_string(),
        });
    }
    let version = root.attribute("version").unwrap_or("");
    let (major, minor) = version.split_once('.').ok_or_else(|| NovxError::NoVersion {
        path: path.to_string(),
    })?;
    let major: u32 = major.parse().map_err(|_| NovxError::NoVersion {
        path: path.to_string(),
    })?;
    let minor: u32 = minor.parse().map_err(|_| NovxError::NoVersion {
        path: path.to_string(),
    })?;
    if major > MAJOR_VERSION {
        return Err(NovxError::NewerVersion {
            path: path.to_string(),
        });
    }
    if major < MAJOR_VERSION {
        return Err(NovxError::OlderVersion {
            path: path.to_string(),
        });
    }
    if minor > MINOR_VERSION {
        return Err(NovxError::NewerVersion {
            path: path.to_string(),
        });
    }
    Ok(())
}

fn read_content(root: Node, project: &mut Project) -> Result<(), String> {
    let novel = &mut project.novel;
    if let Some(xml_project) = child(root, "PROJECT") {
        read_project_meta(xml_project, novel)?;
    }
    read_world_elements(root, novel, "LOCATIONS", "LOCATION")?;
    read_world_elements(root, novel, "ITEMS", "ITEM")?;
    read_characters(root, novel)?;
    read_chapters_and_sections(root, novel)?;
    read_plot_lines_and_points(root, novel)?;
    read_project_notes(root, novel)?;
    read_word_count_log(root, project)?;
    Ok(())
}

fn read_project_meta(node: Node, novel: &mut Novel) -> Result<(), String> {
    novel.title = child_text(node, "Title");
    novel.desc = paragraphs_to_text(child(node, "Desc"));
    novel.links = read_links(node);

    novel.renumber_chapters = node.attribute("renumberChapters") == Some("1");
    novel.renumber_parts = node.attribute("renumberParts") == Some("1");
    novel.renumber_within_parts = node.attribute("renumberWithinParts") == Some("1");
    novel.roman_chapter_numbers = node.attribute("romanChapterNumbers") == Some("1");
    novel.roman_part_numbers = node.attribute("romanPartNumbers") == Some("1");
    novel.save_word_count = node.attribute("saveWordCount") == Some("1");
    novel.work_phase = node
        .attribute("workPhase")
        .and_then(|p| p.parse::<u8>().ok())
        .filter(|p| (1..=5).contains(p));

    novel.author_name = child_text(node, "Author");
    novel.chapter_heading_prefix = child_text(node, "ChapterHeadingPrefix");
    novel.chapter_heading_suffix = child_text(node, "ChapterHeadingSuffix");
    novel.part_heading_prefix = child_text(node, "PartHeadingPrefix");
    novel.part_heading_suffix = child_text(node, "PartHeadingSuffix");
    novel.custom_plot_progress = child_text(node, "CustomPlotProgress");
    novel.custom_characterization = child_text(node, "CustomCharacterization");
    novel.custom_world_building = child_text(node, "CustomWorldBuilding");
    novel.custom_goal = child_text(node, "CustomGoal");
    novel.custom_conflict = child_text(node, "CustomConflict");
    novel.custom_outcome = child_text(node, "CustomOutcome");
    novel.custom_chr_bio = child_text(node, "CustomChrBio");
    novel.custom_chr_goals = child_text(node, "CustomChrGoals");

    if let Some(count) = child_text(node, "WordCountStart") {
        novel.word_count_start = Some(count.parse().map_err(|_| "bad WordCountStart")?);
    }
    if let Some(target) = child_text(node, "WordTarget") {
        novel.word_target = Some(target.parse().map_err(|_| "bad WordTarget")?);
    }
    if let Some(date) = child_text(node, "ReferenceDate") {
        novel.reference_date = Some(verified_date(&date)?);
    }
    Ok(())
}

fn read_world_elements(
    root: Node,
    novel: &mut Novel,
    list_tag: &str,
    item_tag: &str,
) -> Result<(), String> {
    let Some(list) = child(root, list_tag) else {
        return Ok(());
    };
    let prefix = if list_tag == "LOCATIONS" {
        LOCATION_PREFIX
    } else {
        ITEM_PREFIX
    };
    for node in list.children().filter(|c| c.has_tag_name(item_tag)) {
        let id = required_id(node, prefix)?;
        let mut element = WorldElement::new();
        element.title = child_text(node, "Title");
        element.desc = paragraphs_to_text(child(node, "Desc"));
        element.links = read_links(node);
        element.notes = paragraphs_to_text(child(node, "Notes"));
        element.tags = tags_field(node);
        element.aka = child_text(node, "Aka");
        if prefix == LOCATION_PREFIX {
            novel.tree.add_location(&id);
            novel.locations.insert(id, element);
        } else {
            novel.tree.add_item(&id);
            novel.items.insert(id, element);
        }
    }
    Ok(())
}

fn read_characters(root: Node, novel: &mut Novel) -> Result<(), String> {
    let Some(list) = child(root, "CHARACTERS") else {
        return Ok(());
    };
    for node in list.children().filter(|c| c.has_tag_name("CHARACTER")) {
        let id = required_id(node, CHARACTER_PREFIX)?;
        let mut character = Character::new();
        character.title = child_text(node, "Title");
        character.desc = paragraphs_to_text(child(node, "Desc"));
        character.links = read_links(node);
        character.notes = paragraphs_to_text(child(node, "Notes"));
        character.tags = tags_field(node);
        character.aka = child_text(node, "Aka");
        character.is_major = node.attribute("major") == Some("1");
        character.full_name = child_text(node, "FullName");
        character.bio = paragraphs_to_text(child(node, "Bio"));
        character.goals = paragraphs_to_text(child(node, "Goals"));
        if let Some(date) = child_text(node, "BirthDate") {
            character.birth_date = Some(verified_date(&date)?);
        }
        if let Some(date) = child_text(node, "DeathDate") {
            character.death_date = Some(verified_date(&date)?);
        }
        novel.tree.add_character(&id);
        novel.characters.insert(id, character);
    }
    Ok(())
}

fn read_chapters_and_sections(root: Node, novel: &mut Novel) -> Result<(), String> {
    let Some(list) = child(root, "CHAPTERS") else {
        return Ok(());
    };
    for xml_chp in list.children().filter(|c| c.has_tag_name("CHAPTER")) {
        let ch_id = required_id(xml_chp, CHAPTER_PREFIX)?;
        let mut chapter = Chapter::new();
        chapter.title = child_text(xml_chp, "Title");
        chapter.desc = paragraphs_to_text(child(xml_chp, "Desc"));
        chapter.links = read_links(xml_chp);
        chapter.notes = paragraphs_to_text(child(xml_chp, "Notes"));
        chapter.ch_type = match xml_chp.attribute("type") {
            Some("0") | None => crate::model::ChapterType::Normal,
            _ => crate::model::ChapterType::Unused,
        };
        chapter.level = if xml_chp.attribute("level") == Some("1") {
            ChapterLevel::Part
        } else {
            ChapterLevel::Chapter
        };
        chapter.is_trash = xml_chp.attribute("isTrash") == Some("1");
        chapter.no_number = xml_chp.attribute("noNumber") == Some("1");
        novel.tree.add_chapter(&ch_id);
        novel.chapters.insert(ch_id.clone(), chapter);

        for xml_scn in xml_chp.children().filter(|c| c.has_tag_name("SECTION")) {
            let sc_id = required_id(xml_scn, SECTION_PREFIX)?;
            let section = read_section(xml_scn, novel)?;
            novel.tree.add_section(&ch_id, &sc_id);
            novel.sections.insert(sc_id, section);
        }
    }
    Ok(())
}

fn read_section(node: Node, novel: &Novel) -> Result<Section, String> {
    let mut section = Section::new();
    section.title = child_text(node, "Title");
    section.desc = paragraphs_to_text(child(node, "Desc"));
    section.links = read_links(node);
    section.notes = paragraphs_to_text(child(node, "Notes"));
    section.tags = tags_field(node);

    section.sc_type = match node.attribute("type").unwrap_or("0").parse::<u8>() {
        Ok(code) if code <= 3 => SectionType::from_code(code),
        _ => SectionType::Unused,
    };
    section.status = node
        .attribute("status")
        .and_then(|s| s.parse::<u8>().ok())
        .map_or(Status::Outline, Status::from_code);
    section.scene = node
        .attribute("scene")
        .and_then(|s| s.parse::<u8>().ok())
        .map_or(SceneKind::NotApplicable, SceneKind::from_code);
    if section.scene == SceneKind::NotApplicable {
        // Legacy files encode action/reaction as "pacing".
        if let Some(pacing) = node.attribute("pacing").and_then(|p| p.parse::<u8>().ok()) {
            if pacing == 1 || pacing == 2 {
                section.scene = SceneKind::from_code(pacing + 1);
            }
        }
    }
    section.append_to_prev = node.attribute("append") == Some("1");

    section.goal = paragraphs_to_text(child(node, "Goal"));
    section.conflict = paragraphs_to_text(child(node, "Conflict"));
    section.outcome = paragraphs_to_text(child(node, "Outcome"));

    let plot_notes_parent = child(node, "PlotNotes").unwrap_or(node);
    for xml_note in plot_notes_parent
        .children()
        .filter(|c| c.has_tag_name("PlotlineNotes"))
    {
        let Some(pl_id) = xml_note.attribute("id") else {
            continue;
        };
        if let Some(text) = paragraphs_to_text(Some(xml_note)) {
            section.plotline_notes.push((pl_id.to_string(), text));
        }
    }

    if let Some(date) = child_text(node, "Date") {
        section.date = Some(verified_date(&date)?);
    } else if let Some(day) = child_text(node, "Day") {
        section.day = Some(verified_int_string(&day)?);
    }
    if let Some(time) = child_text(node, "Time") {
        section.time = Some(verified_time(&time)?);
    }
    if let Some(lasts) = child_text(node, "LastsDays") {
        section.lasts_days = Some(verified_int_string(&lasts)?);
    }
    if let Some(lasts) = child_text(node, "LastsHours") {
        section.lasts_hours = Some(verified_int_string(&lasts)?);
    }
    if let Some(lasts) = child_text(node, "LastsMinutes") {
        section.lasts_minutes = Some(verified_int_string(&lasts)?);
    }

    section.characters = intersection(&ref_ids(node, "Characters"), novel.tree.characters());
    section.locations = intersection(&ref_ids(node, "Locations"), novel.tree.locations());
    section.items = intersection(&ref_ids(node, "Items"), novel.tree.items());

    section.set_content(Some(read_section_content(node)));
    Ok(section)
}

/// Inner XML of `<Content>`, normalized to a single line (indentation
/// between paragraphs is layout, not data).
fn read_section_content(node: Node) -> String {
    let Some(content) = child(node, "Content") else {
        return "<p></p>".to_string();
    };
    let fragment = inner_xml(content);
    let fragment: String = fragment
        .split('\n')
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("");
    if fragment.is_empty() {
        "<p></p>".to_string()
    } else {
        fragment
    }
}

fn ref_ids(node: Node, tag: &str) -> Vec<String> {
    child(node, tag)
        .and_then(|n| n.attribute("ids"))
        .map(|ids| string_to_list(ids, ' '))
        .unwrap_or_default()
}

fn read_plot_lines_and_points(root: Node, novel: &mut Novel) -> Result<(), String> {
    let Some(list) = child(root, "ARCS") else {
        return Ok(());
    };
    for xml_arc in list.children().filter(|c| c.has_tag_name("ARC")) {
        let pl_id = required_id(xml_arc, PLOT_LINE_PREFIX)?;
        let mut plot_line = PlotLine::new();
        plot_line.title = child_text(xml_arc, "Title");
        plot_line.desc = paragraphs_to_text(child(xml_arc, "Desc"));
        plot_line.links = read_links(xml_arc);
        plot_line.notes = paragraphs_to_text(child(xml_arc, "Notes"));
        plot_line.short_name = child_text(xml_arc, "ShortName");
        let section_ids = ref_ids(xml_arc, "Sections");
        let known: Vec<String> = novel.sections.keys().cloned().collect();
        plot_line.sections = intersection(&section_ids, &known);
        for sc_id in &plot_line.sections {
            if let Some(section) = novel.sections.get_mut(sc_id) {
                section.plot_lines.push(pl_id.clone());
            }
        }
        novel.tree.add_plot_line(&pl_id);

        for xml_point in xml_arc.children().filter(|c| c.has_tag_name("POINT")) {
            let pp_id = required_id(xml_point, PLOT_POINT_PREFIX)?;
            let mut plot_point = PlotPoint::new();
            plot_point.title = child_text(xml_point, "Title");
            plot_point.desc = paragraphs_to_text(child(xml_point, "Desc"));
            plot_point.links = read_links(xml_point);
            plot_point.notes = paragraphs_to_text(child(xml_point, "Notes"));
            plot_point.section_assoc = child(xml_point, "Section")
                .and_then(|s| s.attribute("id"))
                .map(|s| s.to_string());
            if let Some(sc_id) = plot_point.section_assoc.clone() {
                if let Some(section) = novel.sections.get_mut(&sc_id) {
                    section.plot_points.push((pp_id.clone(), pl_id.clone()));
                } else {
                    plot_point.section_assoc = None;
                }
            }
            novel.tree.add_plot_point(&pl_id, &pp_id);
            novel.plot_points.insert(pp_id, plot_point);
        }
        novel.plot_lines.insert(pl_id, plot_line);
    }
    Ok(())
}

fn read_project_notes(root: Node, novel: &mut Novel) -> Result<(), String> {
    let Some(list) = child(root, "PROJECTNOTES") else {
        return Ok(());
    };
    for node in list.children().filter(|c| c.has_tag_name("PROJECTNOTE")) {
        let pn_id = required_id(node, PRJ_NOTE_PREFIX)?;
        let mut note = ProjectNote::default();
        note.title = child_text(node, "Title");
        note.desc = paragraphs_to_text(child(node, "Desc"));
        note.links = read_links(node);
        novel.tree.add_project_note(&pn_id);
        novel.project_notes.insert(pn_id, note);
    }
    Ok(())
}

fn read_word_count_log(root: Node, project: &mut Project) -> Result<(), String> {
    let Some(list) = child(root, "PROGRESS") else {
        return Ok(());
    };
    for wc in list.children().filter(|c| c.has_tag_name("WC")) {
        let (Some(date), Some(count), Some(with_unused)) = (
            child_text(wc, "Date"),
            child_text(wc, "Count"),
            child_text(wc, "WithUnused"),
        ) else {
            continue;
        };
        let date = verified_date(&date)?;
        let count = verified_int_string(&count)?;
        let with_unused = verified_int_string(&with_unused)?;
        project.wc_log.insert(date, WcEntry { count, with_unused });
    }
    Ok(())
}

/// If the current word count differs from the latest logged entry, queue
/// an update dated by the file's modification time.
fn queue_word_count_update(path: &Path, project: &mut Project) {
    if project.wc_log.is_empty() {
        return;
    }
    let (count, total) = project.novel.count_words();
    let (count, total) = (count.to_string(), total.to_string());
    let Some((_, latest)) = project.wc_log.latest() else {
        return;
    };
    if latest.count == count && latest.with_unused == total {
        return;
    }
    let date = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| Local::now().format("%Y-%m-%d").to_string());
    project.wc_pending.insert(
        date,
        WcEntry {
            count,
            with_unused: total,
        },
    );
}

fn required_id(node: Node, prefix: &str) -> Result<String, String> {
    let id = node
        .attribute("id")
        .ok_or_else(|| format!("missing id on <{}>", node.tag_name().name()))?;
    if !has_prefix(id, prefix) {
        return Err(format!("bad ID: '{id}'"));
    }
    Ok(id.to_string())
}

fn tags_field(node: Node) -> Vec<String> {
    child_text(node, "Tags")
        .map(|t| string_to_list(&t, ';'))
        .unwrap_or_default()
}

/// Reads `<Link>` children in both the element form (`<Path>`,
/// `<FullPath>`) and the legacy attribute form.
fn read_links(node: Node) -> Vec<Link> {
    let mut links = Vec::new();
    for xml_link in node.children().filter(|c| c.has_tag_name("Link")) {
        let (path, full_path) = match child(xml_link, "Path") {
            Some(path_node) => (
                path_node.text().map(|t| t.to_string()),
                child_text(xml_link, "FullPath"),
            ),
            None => (
                xml_link.attribute("path").map(|p| p.to_string()),
                xml_link.attribute("fullPath").map(|p| p.to_string()),
            ),
        };
        if let Some(path) = path {
            if !path.is_empty() {
                links.push(Link { path, full_path });
            }
        }
    }
    links
}
