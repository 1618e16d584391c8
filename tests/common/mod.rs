//! Shared test fixtures: minimal but structurally complete project files.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A yw7 project with one normal chapter (two scenes), one arc chapter
/// defining plot line "A" with one plot point, a character, a location,
/// an item, language project variables and a word-count log.
pub fn sample_yw7() -> &'static str {
    r#"<?xml version="1.0" encoding="utf-8"?>
<YWRITER7>
  <PROJECT>
    <Ver>7</Ver>
    <Title><![CDATA[Test Novel]]></Title>
    <Desc><![CDATA[About testing.]]></Desc>
    <AuthorName><![CDATA[Jane Author]]></AuthorName>
    <WordCountStart>100</WordCountStart>
    <WordTarget>50000</WordTarget>
    <Fields>
      <Field_SaveWordCount>1</Field_SaveWordCount>
      <Field_LanguageCode>en</Field_LanguageCode>
      <Field_CountryCode>US</Field_CountryCode>
    </Fields>
  </PROJECT>
  <LOCATIONS>
    <LOCATION>
      <ID>1</ID>
      <Title><![CDATA[Harbor]]></Title>
      <AKA><![CDATA[The docks]]></AKA>
      <Tags><![CDATA[coast;salt]]></Tags>
    </LOCATION>
  </LOCATIONS>
  <ITEMS>
    <ITEM>
      <ID>1</ID>
      <Title><![CDATA[Compass]]></Title>
    </ITEM>
  </ITEMS>
  <CHARACTERS>
    <CHARACTER>
      <ID>1</ID>
      <Title><![CDATA[Ann]]></Title>
      <FullName><![CDATA[Ann Archer]]></FullName>
      <Major>-1</Major>
      <Fields>
        <Field_BirthDate>1990-04-01</Field_BirthDate>
      </Fields>
    </CHARACTER>
  </CHARACTERS>
  <PROJECTVARS>
    <PROJECTVAR>
      <ID>1</ID>
      <Title><![CDATA[Language]]></Title>
      <Desc><![CDATA[en]]></Desc>
      <Tags>0</Tags>
    </PROJECTVAR>
    <PROJECTVAR>
      <ID>2</ID>
      <Title><![CDATA[Country]]></Title>
      <Desc><![CDATA[US]]></Desc>
      <Tags>0</Tags>
    </PROJECTVAR>
  </PROJECTVARS>
  <SCENES>
    <SCENE>
      <ID>1</ID>
      <Title><![CDATA[Opening]]></Title>
      <Fields>
        <Field_SceneArcs><![CDATA[A]]></Field_SceneArcs>
      </Fields>
      <Status>2</Status>
      <SceneContent><![CDATA[First line with [i]emphasis[/i].
Second line.]]></SceneContent>
      <Tags><![CDATA[start]]></Tags>
      <SpecificDateTime>2024-03-01 08:30:00</SpecificDateTime>
      <Goal><![CDATA[Get out]]></Goal>
      <Characters>
        <CharID>1</CharID>
      </Characters>
      <Locations>
        <LocID>1</LocID>
      </Locations>
      <Items>
        <ItemID>1</ItemID>
      </Items>
    </SCENE>
    <SCENE>
      <ID>2</ID>
      <Title><![CDATA[Cut scene]]></Title>
      <Unused>-1</Unused>
      <Status>1</Status>
      <SceneContent><![CDATA[Gone now.]]></SceneContent>
    </SCENE>
    <SCENE>
      <ID>3</ID>
      <Title><![CDATA[Midpoint]]></Title>
      <Fields>
        <Field_SceneType>2</Field_SceneType>
        <Field_SceneAssoc>1</Field_SceneAssoc>
      </Fields>
      <Unused>-1</Unused>
      <Status>1</Status>
      <SceneContent></SceneContent>
    </SCENE>
  </SCENES>
  <CHAPTERS>
    <CHAPTER>
      <ID>1</ID>
      <Title><![CDATA[One]]></Title>
      <Type>0</Type>
      <ChapterType>0</ChapterType>
      <Scenes>
        <ScID>1</ScID>
        <ScID>2</ScID>
      </Scenes>
    </CHAPTER>
    <CHAPTER>
      <ID>9</ID>
      <Title><![CDATA[Main arc]]></Title>
      <Unused>-1</Unused>
      <Fields>
        <Field_ArcDefinition><![CDATA[A]]></Field_ArcDefinition>
      </Fields>
      <Type>1</Type>
      <ChapterType>2</ChapterType>
      <Scenes>
        <ScID>3</ScID>
      </Scenes>
    </CHAPTER>
  </CHAPTERS>
  <WCLog>
    <WC>
      <Date>2024-03-01</Date>
      <Count>9</Count>
      <TotalCount>11</TotalCount>
    </WC>
  </WCLog>
</YWRITER7>
"#
}

/// The novx counterpart of [`sample_yw7`]: same story structure, word
/// counts in the progress log matching the actual content.
pub fn sample_novx() -> &'static str {
    r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE novx SYSTEM "novx_1_4.dtd">
<?xml-stylesheet href="novx.css" type="text/css"?>
<novx version="1.4" xml:lang="en-US">
  <PROJECT saveWordCount="1">
    <Title>Test Novel</Title>
    <Desc>
      <p>About testing.</p>
    </Desc>
    <Author>Jane Author</Author>
    <WordCountStart>100</WordCountStart>
    <WordTarget>50000</WordTarget>
  </PROJECT>
  <CHAPTERS>
    <CHAPTER id="ch1">
      <Title>One</Title>
      <SECTION id="sc1" status="2" scene="1">
        <Title>Opening</Title>
        <Tags>start</Tags>
        <Goal>
          <p>Get out</p>
        </Goal>
        <Date>2024-03-01</Date>
        <Time>08:30:00</Time>
        <Characters ids="cr1"/>
        <Locations ids="lc1"/>
        <Items ids="it1"/>
        <Content><p>First line with <em>emphasis</em>.</p><p>Second line.</p></Content>
      </SECTION>
      <SECTION id="sc2" type="1">
        <Title>Cut scene</Title>
        <Content><p>Gone now.</p></Content>
      </SECTION>
    </CHAPTER>
  </CHAPTERS>
  <CHARACTERS>
    <CHARACTER id="cr1" major="1">
      <Title>Ann</Title>
      <FullName>Ann Archer</FullName>
      <BirthDate>1990-04-01</BirthDate>
    </CHARACTER>
  </CHARACTERS>
  <LOCATIONS>
    <LOCATION id="lc1">
      <Title>Harbor</Title>
      <Aka>The docks</Aka>
      <Tags>coast;salt</Tags>
    </LOCATION>
  </LOCATIONS>
  <ITEMS>
    <ITEM id="it1">
      <Title>Compass</Title>
    </ITEM>
  </ITEMS>
  <ARCS>
    <ARC id="ac9">
      <Title>Main arc</Title>
      <ShortName>A</ShortName>
      <Sections ids="sc1"/>
      <POINT id="ap3">
        <Title>Midpoint</Title>
        <Section id="sc1"/>
      </POINT>
    </ARC>
  </ARCS>
  <PROJECTNOTES/>
  <PROGRESS>
    <WC>
      <Date>2024-03-01</Date>
      <Count>6</Count>
      <WithUnused>8</WithUnused>
    </WC>
  </PROGRESS>
</novx>
"#
}

/// A v1-dialect collection manifest with one top-level book and one
/// series containing a second book. `{book}` placeholders are replaced
/// with the given project path.
pub fn sample_pwc_v1(book_path: &Path) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<collection version="1.0">
  <book id="1">
    <title>Standalone</title>
    <desc>First paragraph.
Second paragraph.</desc>
    <path>{book}</path>
  </book>
  <series id="2">
    <title>The Series</title>
    <book id="3">
      <title>Part One</title>
      <path>{book}</path>
    </book>
  </series>
</collection>
"#,
        book = book_path.display()
    )
}

/// The same manifest in the older all-caps dialect.
pub fn sample_pwc_old(book_path: &Path) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<COLLECTION version="0.5">
  <BOOK ID="1">
    <Title>Standalone</Title>
    <Path>{book}</Path>
  </BOOK>
  <SERIES ID="2">
    <Title>The Series</Title>
    <BOOK ID="3">
      <Title>Part One</Title>
      <Path>{book}</Path>
    </BOOK>
  </SERIES>
</COLLECTION>
"#,
        book = book_path.display()
    )
}
