use shared_types::{Language, LetterType, StructuredData};

pub fn build_system_prompt() -> String {
    r#"You are an expert Malaysian letter writer.

Write the letter as HTML paragraphs. Put every section in its own <p> element,
use <br> for line breaks inside a section and put a single <hr> right after the
sender block. Output only the letter markup.

ENGLISH FORMAT:
<p>[Sender Name]<br>[Address]<br>[Contact]</p>
<hr>
<p>[Recipient Name]<br>[Title]<br>[Organization]<br>[Address]</p>
<p>[Date: DD Month YYYY]</p>
<p>Dear Sir/Madam,</p>
<p>Subject: [Subject]</p>
<p>[Opening paragraph]</p>
<p>[Body paragraphs]</p>
<p>[Closing paragraph]</p>
<p>Yours faithfully,</p>
<p>[Sender Name]</p>

MALAY FORMAT:
<p>[Nama]<br>[Alamat]<br>[Telefon]</p>
<hr>
<p>[Penerima]<br>[Jawatan]<br>[Organisasi]<br>[Alamat]</p>
<p>[Tarikh: DD Bulan YYYY]</p>
<p>Tuan/Puan,</p>
<p>Perkara: [Subjek]</p>
<p>Dengan segala hormatnya, [content]</p>
<p>Sekian, terima kasih.</p>
<p>Yang benar,</p>
<p>[Nama]</p>

TONE CONVERSION:
"Boss I MC lah" → "I am writing to inform you of my medical leave"

Use [SENDER_NAME], [DATE] if info missing."#
        .to_string()
}

pub fn build_user_prompt(
    structured: &StructuredData,
    language: Language,
    letter_type: LetterType,
) -> Result<String, serde_json::Error> {
    let data_json = serde_json::to_string_pretty(structured)?;
    let key_points = structured
        .key_points
        .iter()
        .map(|point| format!("- {point}"))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        r#"Generate a professional {letter_type} letter in {language_name}.

Structured Data:
{data_json}

Key Points:
{key_points}

Generate complete letter now."#,
        language_name = language.letter_language_name(),
    ))
}
