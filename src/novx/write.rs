//! Writing the model to a `.novx` project file.

use std::io::Cursor;
use std::path::Path;

use chrono::Local;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::model::fields::list_to_string;
use crate::model::{
    ChapterLevel, ChapterType, Link, Novel, Project, SceneKind, Section, Status, WcEntry,
    WordCountLog,
};
use crate::utils::fsio::write_with_backup;

use super::error::NovxError;
use super::XML_HEADER;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Writes a novelibre project file, backing up any existing target.
pub fn write_project(path: &Path, project: &mut Project) -> Result<(), NovxError> {
    // Word-count log maintenance happens only when the project tracks it.
    if project.novel.save_word_count {
        let (count, total) = project.novel.count_words();
        project.wc_pending.insert(
            Local::now().format("%Y-%m-%d").to_string(),
            WcEntry {
                count: count.to_string(),
                with_unused: total.to_string(),
            },
        );
        let pending = project.wc_pending.clone();
        project.wc_log.merge(&pending);
    }
    project.wc_pending = WordCountLog::new();

    project.novel.adjust_section_types();
    project.novel.detect_languages();
    if project.novel.language_code.is_none() {
        project.novel.check_locale();
    }

    let body = build_document(&project.novel, &project.wc_log)?;
    let document = format!("{XML_HEADER}{body}");
    write_with_backup(path, &document).map_err(|_| NovxError::Write {
        path: path.display().to_string(),
    })
}

fn build_document(novel: &Novel, wc_log: &WordCountLog) -> Result<String, NovxError> {
    let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    let mut root = BytesStart::new("novx");
    root.push_attribute((
        "version",
        format!("{}.{}", super::MAJOR_VERSION, super::MINOR_VERSION).as_str(),
    ));
    let locale = format!(
        "{}-{}",
        novel.language_code.as_deref().unwrap_or("zxx"),
        novel.country_code.as_deref().unwrap_or("none")
    );
    root.push_attribute(("xml:lang", locale.as_str()));
    w.write_event(Event::Start(root))?;

    write_project_meta(&mut w, novel)?;
    write_chapters(&mut w, novel)?;
    write_characters(&mut w, novel)?;
    write_world_elements(&mut w, novel, "LOCATIONS", "LOCATION")?;
    write_world_elements(&mut w, novel, "ITEMS", "ITEM")?;
    write_plot_lines(&mut w, novel)?;
    write_project_notes(&mut w, novel)?;
    write_wc_log(&mut w, novel, wc_log)?;

    w.write_event(Event::End(BytesEnd::new("novx")))?;
    let bytes = w.into_inner().into_inner();
    Ok(String::from_utf8(bytes).expect("writer produced valid UTF-8"))
}

fn write_project_meta(w: &mut XmlWriter, novel: &Novel) -> Result<(), NovxError> {
    let mut el = BytesStart::new("PROJECT");
    for (name, value) in [
        ("renumberChapters", novel.renumber_chapters),
        ("renumberParts", novel.renumber_parts),
        ("renumberWithinParts", novel.renumber_within_parts),
        ("romanChapterNumbers", novel.roman_chapter_numbers),
        ("romanPartNumbers", novel.roman_part_numbers),
        ("saveWordCount", novel.save_word_count),
    ] {
        if value {
            el.push_attribute((name, "1"));
        }
    }
    if let Some(phase) = novel.work_phase {
        el.push_attribute(("workPhase", phase.to_string().as_str()));
    }
    w.write_event(Event::Start(el))?;

    opt_text(w, "Title", novel.title.as_deref())?;
    opt_paragraphs(w, "Desc", novel.desc.as_deref())?;
    write_links(w, &novel.links)?;
    opt_text(w, "Author", novel.author_name.as_deref())?;
    opt_text(w, "ChapterHeadingPrefix", novel.chapter_heading_prefix.as_deref())?;
    opt_text(w, "ChapterHeadingSuffix", novel.chapter_heading_suffix.as_deref())?;
    opt_text(w, "PartHeadingPrefix", novel.part_heading_prefix.as_deref())?;
    opt_text(w, "PartHeadingSuffix", novel.part_heading_suffix.as_deref())?;
    opt_text(w, "CustomPlotProgress", novel.custom_plot_progress.as_deref())?;
    opt_text(w, "CustomCharacterization", novel.custom_characterization.as_deref())?;
    opt_text(w, "CustomWorldBuilding", novel.custom_world_building.as_deref())?;
    opt_text(w, "CustomGoal", novel.custom_goal.as_deref())?;
    opt_text(w, "CustomConflict", novel.custom_conflict.as_deref())?;
    opt_text(w, "CustomOutcome", novel.custom_outcome.as_deref())?;
    opt_text(w, "CustomChrBio", novel.custom_chr_bio.as_deref())?;
    opt_text(w, "CustomChrGoals", novel.custom_chr_goals.as_deref())?;
    if let Some(count) = novel.word_count_start.filter(|c| *c != 0) {
        el_text(w, "WordCountStart", &count.to_string())?;
    }
    if let Some(target) = novel.word_target.filter(|t| *t != 0) {
        el_text(w, "WordTarget", &target.to_string())?;
    }
    opt_text(w, "ReferenceDate", novel.reference_date.as_deref())?;

    w.write_event(Event::End(BytesEnd::new("PROJECT")))?;
    Ok(())
}

fn write_chapters(w: &mut XmlWriter, novel: &Novel) -> Result<(), NovxError> {
    w.write_event(Event::Start(BytesStart::new("CHAPTERS")))?;
    for ch_id in novel.tree.chapters() {
        let Some(chapter) = novel.chapters.get(ch_id) else {
            continue;
        };
        let mut el = BytesStart::new("CHAPTER");
        el.push_attribute(("id", ch_id.as_str()));
        if chapter.ch_type != ChapterType::Normal {
            el.push_attribute(("type", "1"));
        }
        if chapter.level == ChapterLevel::Part {
            el.push_attribute(("level", "1"));
        }
        if chapter.is_trash {
            el.push_attribute(("isTrash", "1"));
        }
        if chapter.no_number {
            el.push_attribute(("noNumber", "1"));
        }
        w.write_event(Event::Start(el))?;
        opt_text(w, "Title", chapter.title.as_deref())?;
        opt_paragraphs(w, "Desc", chapter.desc.as_deref())?;
        write_links(w, &chapter.links)?;
        opt_paragraphs(w, "Notes", chapter.notes.as_deref())?;
        for sc_id in novel.tree.sections_of(ch_id) {
            if let Some(section) = novel.sections.get(sc_id) {
                write_section(w, sc_id, section)?;
            }
        }
        w.write_event(Event::End(BytesEnd::new("CHAPTER")))?;
    }
    w.write_event(Event::End(BytesEnd::new("CHAPTERS")))?;
    Ok(())
}

fn write_section(w: &mut XmlWriter, sc_id: &str, section: &Section) -> Result<(), NovxError> {
    let mut el = BytesStart::new("SECTION");
    el.push_attribute(("id", sc_id));
    if section.sc_type.code() > 0 {
        el.push_attribute(("type", section.sc_type.code().to_string().as_str()));
    }
    if section.status != Status::Outline {
        el.push_attribute(("status", section.status.code().to_string().as_str()));
    }
    if section.scene != SceneKind::NotApplicable {
        el.push_attribute(("scene", section.scene.code().to_string().as_str()));
    }
    if section.append_to_prev {
        el.push_attribute(("append", "1"));
    }
    w.write_event(Event::Start(el))?;

    opt_text(w, "Title", section.title.as_deref())?;
    opt_paragraphs(w, "Desc", section.desc.as_deref())?;
    write_links(w, &section.links)?;
    opt_paragraphs(w, "Notes", section.notes.as_deref())?;
    if !section.tags.is_empty() {
        el_text(w, "Tags", &list_to_string(&section.tags, ";"))?;
    }
    opt_paragraphs(w, "Goal", section.goal.as_deref())?;
    opt_paragraphs(w, "Conflict", section.conflict.as_deref())?;
    opt_paragraphs(w, "Outcome", section.outcome.as_deref())?;

    for (pl_id, text) in &section.plotline_notes {
        if !section.plot_lines.contains(pl_id) || text.is_empty() {
            continue;
        }
        let mut el = BytesStart::new("PlotlineNotes");
        el.push_attribute(("id", pl_id.as_str()));
        w.write_event(Event::Start(el))?;
        write_paragraph_lines(w, text)?;
        w.write_event(Event::End(BytesEnd::new("PlotlineNotes")))?;
    }

    if let Some(date) = &section.date {
        el_text(w, "Date", date)?;
    } else if let Some(day) = &section.day {
        el_text(w, "Day", day)?;
    }
    if let Some(time) = &section.time {
        el_text(w, "Time", time)?;
    }
    for (tag, value) in [
        ("LastsDays", &section.lasts_days),
        ("LastsHours", &section.lasts_hours),
        ("LastsMinutes", &section.lasts_minutes),
    ] {
        if let Some(value) = value {
            if !value.is_empty() && value != "0" {
                el_text(w, tag, value)?;
            }
        }
    }

    write_id_list(w, "Characters", &section.characters)?;
    write_id_list(w, "Locations", &section.locations)?;
    write_id_list(w, "Items", &section.items)?;

    if let Some(content) = section.content() {
        if !content.is_empty() && content != "<p></p>" && content != "<p />" {
            w.write_event(Event::Start(BytesStart::new("Content")))?;
            // The fragment is already valid escaped XML; embed it verbatim.
            w.write_event(Event::Text(BytesText::from_escaped(content)))?;
            w.write_event(Event::End(BytesEnd::new("Content")))?;
        }
    }
    w.write_event(Event::End(BytesEnd::new("SECTION")))?;
    Ok(())
}

fn write_characters(w: &mut XmlWriter, novel: &Novel) -> Result<(), NovxError> {
    w.write_event(Event::Start(BytesStart::new("CHARACTERS")))?;
    for cr_id in novel.tree.characters() {
        let Some(character) = novel.characters.get(cr_id) else {
            continue;
        };
        let mut el = BytesStart::new("CHARACTER");
        el.push_attribute(("id", cr_id.as_str()));
        if character.is_major {
            el.push_attribute(("major", "1"));
        }
        w.write_event(Event::Start(el))?;
        opt_text(w, "Title", character.title.as_deref())?;
        opt_paragraphs(w, "Desc", character.desc.as_deref())?;
        write_links(w, &character.links)?;
        opt_paragraphs(w, "Notes", character.notes.as_deref())?;
        if !character.tags.is_empty() {
            el_text(w, "Tags", &list_to_string(&character.tags, ";"))?;
        }
        opt_text(w, "Aka", character.aka.as_deref())?;
        opt_text(w, "FullName", character.full_name.as_deref())?;
        opt_paragraphs(w, "Bio", character.bio.as_deref())?;
        opt_paragraphs(w, "Goals", character.goals.as_deref())?;
        opt_text(w, "BirthDate", character.birth_date.as_deref())?;
        opt_text(w, "DeathDate", character.death_date.as_deref())?;
        w.write_event(Event::End(BytesEnd::new("CHARACTER")))?;
    }
    w.write_event(Event::End(BytesEnd::new("CHARACTERS")))?;
    Ok(())
}

fn write_world_elements(
    w: &mut XmlWriter,
    novel: &Novel,
    list_tag: &str,
    item_tag: &str,
) -> Result<(), NovxError> {
    w.write_event(Event::Start(BytesStart::new(list_tag)))?;
    let ids = if list_tag == "LOCATIONS" {
        novel.tree.locations()
    } else {
        novel.tree.items()
    };
    for id in ids {
        let element = if list_tag == "LOCATIONS" {
            novel.locations.get(id)
        } else {
            novel.items.get(id)
        };
        let Some(element) = element else { continue };
        let mut el = BytesStart::new(item_tag);
        el.push_attribute(("id", id.as_str()));
        w.write_event(Event::Start(el))?;
        opt_text(w, "Title", element.title.as_deref())?;
        opt_paragraphs(w, "Desc", element.desc.as_deref())?;
        write_links(w, &element.links)?;
        opt_paragraphs(w, "Notes", element.notes.as_deref())?;
        if !element.tags.is_empty() {
            el_text(w, "Tags", &list_to_string(&element.tags, ";"))?;
        }
        opt_text(w, "Aka", element.aka.as_deref())?;
        w.write_event(Event::End(BytesEnd::new(item_tag)))?;
    }
    w.write_event(Event::End(BytesEnd::new(list_tag)))?;
    Ok(())
}

fn write_plot_lines(w: &mut XmlWriter, novel: &Novel) -> Result<(), NovxError> {
    w.write_event(Event::Start(BytesStart::new("ARCS")))?;
    for pl_id in novel.tree.plot_lines() {
        let Some(plot_line) = novel.plot_lines.get(pl_id) else {
            continue;
        };
        let mut el = BytesStart::new("ARC");
        el.push_attribute(("id", pl_id.as_str()));
        w.write_event(Event::Start(el))?;
        opt_text(w, "Title", plot_line.title.as_deref())?;
        opt_paragraphs(w, "Desc", plot_line.desc.as_deref())?;
        write_links(w, &plot_line.links)?;
        opt_paragraphs(w, "Notes", plot_line.notes.as_deref())?;
        opt_text(w, "ShortName", plot_line.short_name.as_deref())?;
        write_id_list(w, "Sections", &plot_line.sections)?;

        for pp_id in novel.tree.plot_points_of(pl_id) {
            let Some(plot_point) = novel.plot_points.get(pp_id) else {
                continue;
            };
            let mut el = BytesStart::new("POINT");
            el.push_attribute(("id", pp_id.as_str()));
            w.write_event(Event::Start(el))?;
            opt_text(w, "Title", plot_point.title.as_deref())?;
            opt_paragraphs(w, "Desc", plot_point.desc.as_deref())?;
            write_links(w, &plot_point.links)?;
            opt_paragraphs(w, "Notes", plot_point.notes.as_deref())?;
            if let Some(sc_id) = &plot_point.section_assoc {
                let mut section = BytesStart::new("Section");
                section.push_attribute(("id", sc_id.as_str()));
                w.write_event(Event::Empty(section))?;
            }
            w.write_event(Event::End(BytesEnd::new("POINT")))?;
        }
        w.write_event(Event::End(BytesEnd::new("ARC")))?;
    }
    w.write_event(Event::End(BytesEnd::new("ARCS")))?;
    Ok(())
}

fn write_project_notes(w: &mut XmlWriter, novel: &Novel) -> Result<(), NovxError> {
    w.write_event(Event::Start(BytesStart::new("PROJECTNOTES")))?;
    for pn_id in novel.tree.project_notes() {
        let Some(note) = novel.project_notes.get(pn_id) else {
            continue;
        };
        let mut el = BytesStart::new("PROJECTNOTE");
        el.push_attribute(("id", pn_id.as_str()));
        w.write_event(Event::Start(el))?;
        opt_text(w, "Title", note.title.as_deref())?;
        opt_paragraphs(w, "Desc", note.desc.as_deref())?;
        write_links(w, &note.links)?;
        w.write_event(Event::End(BytesEnd::new("PROJECTNOTE")))?;
    }
    w.write_event(Event::End(BytesEnd::new("PROJECTNOTES")))?;
    Ok(())
}

fn write_wc_log(
    w: &mut XmlWriter,
    novel: &Novel,
    wc_log: &WordCountLog,
) -> Result<(), NovxError> {
    if wc_log.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new("PROGRESS")))?;
    let mut last: Option<(&str, &str)> = None;
    for (date, entry) in wc_log.iter() {
        if novel.save_word_count {
            if last == Some((entry.count.as_str(), entry.with_unused.as_str())) {
                continue;
            }
            last = Some((entry.count.as_str(), entry.with_unused.as_str()));
        }
        w.write_event(Event::Start(BytesStart::new("WC")))?;
        el_text(w, "Date", date)?;
        el_text(w, "Count", &entry.count)?;
        el_text(w, "WithUnused", &entry.with_unused)?;
        w.write_event(Event::End(BytesEnd::new("WC")))?;
    }
    w.write_event(Event::End(BytesEnd::new("PROGRESS")))?;
    Ok(())
}

fn write_links(w: &mut XmlWriter, links: &[Link]) -> Result<(), NovxError> {
    for link in links {
        w.write_event(Event::Start(BytesStart::new("Link")))?;
        el_text(w, "Path", &link.path)?;
        if let Some(full_path) = &link.full_path {
            el_text(w, "FullPath", full_path)?;
        }
        w.write_event(Event::End(BytesEnd::new("Link")))?;
    }
    Ok(())
}

fn write_id_list(w: &mut XmlWriter, tag: &str, ids: &[String]) -> Result<(), NovxError> {
    if ids.is_empty() {
        return Ok(());
    }
    let mut el = BytesStart::new(tag);
    el.push_attribute(("ids", ids.join(" ").as_str()));
    w.write_event(Event::Empty(el))?;
    Ok(())
}

fn el_text(w: &mut XmlWriter, tag: &str, text: &str) -> Result<(), NovxError> {
    w.write_event(Event::Start(BytesStart::new(tag)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn opt_text(w: &mut XmlWriter, tag: &str, text: Option<&str>) -> Result<(), NovxError> {
    if let Some(text) = text {
        if !text.is_empty() {
            el_text(w, tag, text)?;
        }
    }
    Ok(())
}

/// Multi-line text fields become one `<p>` element per line.
fn opt_paragraphs(w: &mut XmlWriter, tag: &str, text: Option<&str>) -> Result<(), NovxError> {
    let Some(text) = text else {
        return Ok(());
    };
    if text.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new(tag)))?;
    write_paragraph_lines(w, text)?;
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_paragraph_lines(w: &mut XmlWriter, text: &str) -> Result<(), NovxError> {
    for line in text.split('\n') {
        el_text(w, "p", line)?;
    }
    Ok(())
}
