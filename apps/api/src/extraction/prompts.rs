// Resume field extraction prompt templates.

pub const RESUME_PARSE_SYSTEM: &str = "\
You are an expert HR recruitment assistant. \
You extract candidate details from resume text accurately and never invent data.";

pub const RESUME_PARSE_PROMPT: &str = r#"Analyze the following resume text and extract key information in a structured JSON format.

Extract the following fields:
- "name": The full name of the candidate.
- "email": The primary email address.
- "phone": The primary phone number.
- "location": The candidate's current city and country (e.g., "San Francisco, USA").
- "skills": A list of the top 10-15 most relevant technical and soft skills.
- "education": A list of strings, where each string is a degree or certification (e.g., "Bachelor of Science in Computer Science, University of California").
- "companies": A list of company names the candidate has worked for.

RULES:
1. If a field is not found, return null for that field.
2. For lists (skills, education, companies), return an empty list [] if none are found.
3. The entire output must be a single, valid JSON object enclosed in ```json ... ```.

Resume Text:
---
{resume_text}
---"#;
