use shared_types::LetterType;

pub fn build_system_prompt() -> String {
    r#"You are a Malaysian document analyzer. Extract structured data from speech transcripts.

Output ONLY valid JSON:
{
  "letter_type": "complaint|proposal|mc|general|official",
  "sender": {"name": "", "address": "", "contact": ""},
  "recipient": {"name": "", "title": "", "organization": "", "address": ""},
  "subject": "",
  "key_points": ["point1", "point2"],
  "tone_detected": "casual|manglish|formal",
  "language_preference": "en|ms",
  "dates_mentioned": [],
  "urgency_level": "low|medium|high"
}

MALAYSIAN CONTEXT:
- Agencies: DBKL, MBPJ, JPJ, LHDN
- Titles: YB, Datuk, Tuan, Puan

MANGLISH: Look for "lah", "ah", "can or not"

If info missing, leave empty string."#
        .to_string()
}

pub fn build_user_prompt(transcript: &str, letter_type: LetterType) -> String {
    format!(
        r#"Letter Type: {letter_type}

Transcript: {transcript}

Extract structured data in JSON format."#
    )
}
