use serde::{Deserialize, Serialize};

/// Response of the `search/media` endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    /// Missing when the search produced no usable result set
    #[serde(default)]
    pub data: Option<Vec<SpeechData>>,
}

/// Response of the `media/<id>` endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentResponse {
    pub data: SpeechData,
}

/// One speech ("media" item) as delivered by OpenParliament.tv
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechData {
    pub id: String,
    pub attributes: SpeechAttributes,
    pub relationships: SpeechRelationships,
    #[serde(default)]
    pub links: Option<SpeechLinks>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechAttributes {
    /// Length of the recording in seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub text_contents: Vec<TextContent>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub text_body: Vec<TextBlock>,
}

/// A contiguous block of sentences from one speaker
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextBlock {
    /// "speech" or "comment"
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub speaker: Option<String>,
    /// "main-speaker", "president", or null for general comments
    #[serde(default)]
    pub speakerstatus: Option<String>,
    #[serde(default)]
    pub sentences: Vec<RawSentence>,
}

/// A sentence with its timestamps as sent by the API.
///
/// Timestamps are seconds, usually strings with three decimals, sometimes
/// numbers, sometimes absent.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSentence {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub time_start: Option<serde_json::Value>,
    #[serde(default)]
    pub time_end: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRelationships {
    pub agenda_item: AgendaItemRelation,
    #[serde(default)]
    pub people: PeopleRelation,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgendaItemRelation {
    pub data: AgendaItem,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgendaItem {
    pub attributes: AgendaItemAttributes,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItemAttributes {
    pub title: String,
    #[serde(default)]
    pub official_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PeopleRelation {
    #[serde(default)]
    pub data: Vec<Person>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Person {
    pub attributes: PersonAttributes,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonAttributes {
    pub label: String,
    #[serde(default)]
    pub label_alternative: Option<Vec<String>>,
    #[serde(default)]
    pub party: Option<Affiliation>,
    #[serde(default)]
    pub faction: Option<Affiliation>,
}

/// Party or faction reference attached to a person
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Affiliation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechLinks {
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,
}

impl PersonAttributes {
    /// Whether `name` is this person's label or one of the alternative labels
    pub fn matches(&self, name: &str) -> bool {
        self.label == name
            || self
                .label_alternative
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .any(|alt| alt == name)
    }
}

impl SpeechData {
    /// Text blocks of the first text content, empty if the speech has none
    pub fn text_blocks(&self) -> &[TextBlock] {
        self.attributes
            .text_contents
            .first()
            .map(|c| c.text_body.as_slice())
            .unwrap_or(&[])
    }

    /// Find the first person whose label or alternative label matches `name`
    pub fn find_person(&self, name: &str) -> Option<&PersonAttributes> {
        self.relationships
            .people
            .data
            .iter()
            .map(|p| &p.attributes)
            .find(|p| p.matches(name))
    }
}

/// A fetched speech together with the URL it can be retrieved from
#[derive(Debug, Clone)]
pub struct SpeechDocument {
    pub source_url: String,
    pub data: SpeechData,
}

#[cfg(test)]
pub(crate) const SAMPLE_SPEECH: &str = r#"{
    "data": {
        "type": "media",
        "id": "DE-0200042017",
        "attributes": {
            "duration": 312.5,
            "dateStart": "2022-06-01T10:15:00",
            "dateEnd": "2022-06-01T10:20:12",
            "textContents": [{
                "textBody": [
                    {
                        "type": "speech",
                        "speaker": "Bärbel Bas",
                        "speakerstatus": "president",
                        "sentences": [
                            {"text": "Das Wort hat Martin Sichert.", "timeStart": "0.000", "timeEnd": "2.500"}
                        ]
                    },
                    {
                        "type": "speech",
                        "speaker": "Martin Sichert",
                        "speakerstatus": "main-speaker",
                        "sentences": [
                            {"text": "Sehr geehrte Frau Präsidentin!", "timeStart": "2.500", "timeEnd": "4.500"},
                            {"text": "Das ist ein schlechter Entwurf.", "timeStart": "4.500", "timeEnd": 9.5},
                            {"text": "Applaus bitte."}
                        ]
                    },
                    {
                        "type": "comment",
                        "speaker": null,
                        "speakerstatus": null,
                        "sentences": [
                            {"text": "(Beifall bei der AfD)", "timeStart": "9.500", "timeEnd": "10.000"}
                        ]
                    }
                ]
            }]
        },
        "relationships": {
            "agendaItem": {
                "data": {
                    "attributes": {
                        "title": "Pflegereform",
                        "officialTitle": "Tagesordnungspunkt 5: Pflegereform"
                    }
                }
            },
            "people": {
                "data": [
                    {
                        "attributes": {
                            "label": "Bärbel Bas",
                            "labelAlternative": null,
                            "party": {"id": "Q49762", "label": "SPD"},
                            "faction": {"id": "Q2207512", "label": "SPD"}
                        }
                    },
                    {
                        "attributes": {
                            "label": "Martin Sichert",
                            "labelAlternative": ["Martin Hans Sichert"],
                            "party": {"id": "Q6721203", "label": "AfD"},
                            "faction": {"id": "Q42575708", "label": "AfD"}
                        }
                    }
                ]
            }
        },
        "links": {"self": "https://de.openparliament.tv/api/v1/media/DE-0200042017"}
    }
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_response() {
        let response: DocumentResponse = serde_json::from_str(SAMPLE_SPEECH).unwrap();
        let data = response.data;

        assert_eq!(data.id, "DE-0200042017");
        assert_eq!(data.attributes.duration, 312.5);
        assert_eq!(data.text_blocks().len(), 3);
        assert_eq!(data.text_blocks()[1].sentences.len(), 3);
        assert!(data.text_blocks()[1].sentences[2].time_start.is_none());
        assert_eq!(data.relationships.agenda_item.data.attributes.title, "Pflegereform");
        assert_eq!(
            data.links.and_then(|l| l.self_link).as_deref(),
            Some("https://de.openparliament.tv/api/v1/media/DE-0200042017")
        );
    }

    #[test]
    fn test_find_person_by_alternative_label() {
        let response: DocumentResponse = serde_json::from_str(SAMPLE_SPEECH).unwrap();

        let person = response.data.find_person("Martin Hans Sichert").unwrap();
        assert_eq!(person.label, "Martin Sichert");
        assert!(response.data.find_person("Nobody").is_none());
    }

    #[test]
    fn test_search_response_without_data() {
        let response: SearchResponse = serde_json::from_str(r#"{"meta": {}}"#).unwrap();
        assert!(response.data.is_none());
    }
}
