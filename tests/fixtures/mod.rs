//! Shared test fixtures for project file tests.
#![allow(dead_code)] // Not every test file uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A small yWriter 7 project as yWriter itself writes it.
///
/// - Locale `en`/`GB` with one inline language pair (`fr`)
/// - Chapter 1 (normal) lists scenes 1 and 2, chapter 2 (notes) scene 3
/// - Scene 1 carries an element the codec does not know (`CustomNote`)
pub const SAMPLE_YW7: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<YWRITER7>
  <PROJECT>
    <Ver>7</Ver>
    <Title><![CDATA[The Lighthouse]]></Title>
    <AuthorName><![CDATA[A. Keeper]]></AuthorName>
    <Desc><![CDATA[A story about light & dark.]]></Desc>
    <FieldTitle1><![CDATA[Lead]]></FieldTitle1>
    <WordTarget>60000</WordTarget>
  </PROJECT>
  <LOCATIONS>
    <LOCATION>
      <ID>1</ID>
      <Title><![CDATA[Lighthouse]]></Title>
      <Desc><![CDATA[White tower on the cliff]]></Desc>
      <SortOrder>1</SortOrder>
    </LOCATION>
  </LOCATIONS>
  <ITEMS>
    <ITEM>
      <ID>1</ID>
      <Title><![CDATA[Lamp]]></Title>
      <Tags><![CDATA[light;brass]]></Tags>
      <SortOrder>1</SortOrder>
    </ITEM>
  </ITEMS>
  <CHARACTERS>
    <CHARACTER>
      <ID>1</ID>
      <Title><![CDATA[Ada]]></Title>
      <SortOrder>1</SortOrder>
      <FullName><![CDATA[Ada Quill]]></FullName>
      <Major>-1</Major>
    </CHARACTER>
    <CHARACTER>
      <ID>2</ID>
      <Title><![CDATA[Ben]]></Title>
      <SortOrder>2</SortOrder>
    </CHARACTER>
  </CHARACTERS>
  <PROJECTNOTES>
    <PROJECTNOTE>
      <ID>1</ID>
      <Title><![CDATA[Research]]></Title>
      <Desc><![CDATA[Tide tables]]></Desc>
      <SortOrder>1</SortOrder>
    </PROJECTNOTE>
  </PROJECTNOTES>
  <PROJECTVARS>
    <PROJECTVAR>
      <ID>1</ID>
      <Title><![CDATA[Language]]></Title>
      <Desc><![CDATA[en]]></Desc>
      <Tags><![CDATA[0]]></Tags>
    </PROJECTVAR>
    <PROJECTVAR>
      <ID>2</ID>
      <Title><![CDATA[Country]]></Title>
      <Desc><![CDATA[GB]]></Desc>
      <Tags><![CDATA[0]]></Tags>
    </PROJECTVAR>
    <PROJECTVAR>
      <ID>3</ID>
      <Title><![CDATA[lang=fr]]></Title>
      <Desc><![CDATA[<HTM <SPAN LANG="fr"> /HTM>]]></Desc>
      <Tags><![CDATA[0]]></Tags>
    </PROJECTVAR>
    <PROJECTVAR>
      <ID>4</ID>
      <Title><![CDATA[/lang=fr]]></Title>
      <Desc><![CDATA[<HTM </SPAN> /HTM>]]></Desc>
      <Tags><![CDATA[0]]></Tags>
    </PROJECTVAR>
  </PROJECTVARS>
  <SCENES>
    <SCENE>
      <ID>1</ID>
      <Title><![CDATA[Arrival]]></Title>
      <BelongsToChID>1</BelongsToChID>
      <Desc><![CDATA[Ada reaches the tower.]]></Desc>
      <SceneContent><![CDATA[Ada climbs the stairs. [lang=fr]Bonjour[/lang=fr]!]]></SceneContent>
      <WordCount>5</WordCount>
      <LetterCount>31</LetterCount>
      <Fields>
        <Field_SceneArcs>A</Field_SceneArcs>
      </Fields>
      <Status>2</Status>
      <CustomNote>keep me</CustomNote>
      <Characters>
        <CharID>1</CharID>
        <CharID>2</CharID>
      </Characters>
      <Locations>
        <LocID>1</LocID>
      </Locations>
    </SCENE>
    <SCENE>
      <ID>2</ID>
      <Title><![CDATA[Night]]></Title>
      <BelongsToChID>1</BelongsToChID>
      <SceneContent><![CDATA[The lamp burns.
Ben sleeps.]]></SceneContent>
      <WordCount>5</WordCount>
      <LetterCount>26</LetterCount>
      <Day>1</Day>
      <Hour>22</Hour>
      <Minute>0</Minute>
      <Items>
        <ItemID>1</ItemID>
      </Items>
    </SCENE>
    <SCENE>
      <ID>3</ID>
      <Title><![CDATA[Plan]]></Title>
      <BelongsToChID>2</BelongsToChID>
      <SceneContent><![CDATA[Check the tides.]]></SceneContent>
      <WordCount>3</WordCount>
      <LetterCount>16</LetterCount>
      <Unused>-1</Unused>
      <Fields>
        <Field_SceneType>1</Field_SceneType>
      </Fields>
    </SCENE>
  </SCENES>
  <CHAPTERS>
    <CHAPTER>
      <ID>1</ID>
      <Title><![CDATA[Part One]]></Title>
      <SortOrder>1</SortOrder>
      <Type>0</Type>
      <ChapterType>0</ChapterType>
      <Scenes>
        <ScID>1</ScID>
        <ScID>2</ScID>
      </Scenes>
    </CHAPTER>
    <CHAPTER>
      <ID>2</ID>
      <Title><![CDATA[Working notes]]></Title>
      <Unused>-1</Unused>
      <SortOrder>2</SortOrder>
      <Type>1</Type>
      <ChapterType>1</ChapterType>
      <Scenes>
        <ScID>3</ScID>
      </Scenes>
    </CHAPTER>
  </CHAPTERS>
</YWRITER7>
"#;

/// Routes `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Writes `xml` to `novel.yw7` in a fresh temp directory.
///
/// Keep the `TempDir` alive for as long as the file is needed.
pub fn create_temp_project(xml: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("novel.yw7");
    fs::write(&path, xml).expect("Failed to write project file");
    (path, temp_dir)
}

/// Creates the sample project in a fresh temp directory.
pub fn create_sample_project() -> (PathBuf, TempDir) {
    create_temp_project(SAMPLE_YW7)
}

/// Reads a file to string, panicking with its path on failure.
pub fn read_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}
