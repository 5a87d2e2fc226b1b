//! Prompt templates for the completion collaborator
//!
//! Each template carries a fixed marker phrase so a prompt can be recognised
//! after the fact ([`PromptKind::detect`]); the scripted completer relies on
//! this to serve canned replies per prompt kind.

use crate::reservation::ReservationSlots;

/// The five kinds of prompt a turn can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Classify,
    Reservation,
    Extract,
    Knowledge,
    Contradiction,
}

impl PromptKind {
    pub const ALL: [PromptKind; 5] = [
        PromptKind::Classify,
        PromptKind::Reservation,
        PromptKind::Extract,
        PromptKind::Knowledge,
        PromptKind::Contradiction,
    ];

    /// Phrase that appears only in prompts of this kind
    pub fn marker(&self) -> &'static str {
        match self {
            PromptKind::Classify => "classify it into ONE of these categories",
            PromptKind::Reservation => "You are a helpful restaurant reservation assistant",
            PromptKind::Extract => "You are an information extractor",
            PromptKind::Knowledge => "KNOWLEDGE BASE:",
            PromptKind::Contradiction => "contains a contradiction or false information",
        }
    }

    /// Recognise which template produced `prompt`
    pub fn detect(prompt: &str) -> Option<PromptKind> {
        Self::ALL.into_iter().find(|kind| prompt.contains(kind.marker()))
    }
}

/// Intent classification prompt
pub fn classification_prompt(user_message: &str, kb_topic_keys: &[&str]) -> String {
    format!(
        r#"Analyze the following user message and {marker}:

User message: "{user_message}"

Categories:
1. "reservation" - Booking or reserving a table, giving a date, time or number of persons, availability questions, confirming a reservation

2. "knowledge" - General world knowledge questions about science, geography, history, facts or trivia (NOT about the restaurant). Known topics include: {topics}

3. "gibberish" - Nonsensical text, random characters, or otherwise incomprehensible input

4. "contradiction" - Obviously false statements, contradictory claims, or claims against common knowledge

5. "profanity" - Rude language, insults, offensive content or disrespectful behaviour

Any greeting such as Hello, Hey or Hi is "reservation".

Examples:
- "Book table for 4 tomorrow" -> reservation
- "What's the capital of France?" -> knowledge
- "How fast is light?" -> knowledge
- "asdflkj qwerty zxcvbn" -> gibberish
- "Is ice hot?" -> contradiction
- "You're stupid" -> profanity

Respond with ONLY one word: reservation, knowledge, gibberish, contradiction, or profanity"#,
        marker = PromptKind::Classify.marker(),
        user_message = user_message,
        topics = kb_topic_keys.join(", "),
    )
}

/// Render conversation history as alternating User/Assistant lines
///
/// Entries at even positions are user messages, odd positions are replies.
/// Returns an empty string for an empty history.
pub fn format_history(history: &[String]) -> String {
    if history.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = history
        .iter()
        .enumerate()
        .map(|(i, msg)| {
            let speaker = if i % 2 == 0 { "User" } else { "Assistant" };
            format!("{}: {}", speaker, msg)
        })
        .collect();
    format!("Recent conversation:\n{}\n\n", lines.join("\n"))
}

/// Conversational reservation prompt; the reply is exactly `YES` once the
/// guest confirms complete details
pub fn reservation_prompt(
    user_message: &str,
    slots: &ReservationSlots,
    history: &[String],
) -> String {
    let show = |slot: Option<&str>| slot.unwrap_or("Not provided").to_string();
    format!(
        r#"{marker}. Your job is to collect three required pieces of information:
1. Date (when they want to dine)
2. Time (what time they prefer)
3. Number of persons (how many people)

{history}Current reservation status:
- Date: {date}
- Time: {time}
- Number of persons: {persons}

- If the user has provided all three pieces of information, ask them to confirm the details.
- If the user confirms all the details, return only YES. Otherwise continue the conversation.

User message: "{user_message}"

Instructions:
- Fuzzy time expressions ("this weekend or maybe Monday morning") produce several candidate slots. If more than one candidate remains, ask exactly one clarifying question ("Do you prefer Saturday, Sunday, or Monday morning?") instead of assuming.
- Use the conversation history to keep context and do not ask for information you already have.
- Acknowledge any new information in the message and ask naturally for the next missing piece.
- If all three details are present and the user confirms them, return only YES.

Respond naturally and ask for the next needed information if incomplete."#,
        marker = PromptKind::Reservation.marker(),
        history = format_history(history),
        date = show(slots.date()),
        time = show(slots.time()),
        persons = show(slots.persons()),
        user_message = user_message,
    )
}

/// Slot extraction prompt; the reply should be a raw JSON object
pub fn extraction_prompt(user_message: &str) -> String {
    format!(
        r#"{marker}.

Extract reservation details from this user message: "{user_message}"

Follow these rules strictly:
1. If the message contains more than one date or time, set both "date" and "time" to null.
2. Extract "date" and "time" only if each is mentioned once and clearly.
3. Any field (date, time, persons) that is not found is null.
4. Return ONLY a raw JSON object, without explanation, markdown or labels.
5. Never use empty strings; use null.

Expected JSON format:
{{"date": "date or day of the week, or null", "time": "time in readable format or null", "persons": "number of persons as string or null"}}

Examples:
Input: Book on this Monday or Tuesday
Output: {{"date": null, "time": null, "persons": null}}

Input: Book on this Monday
Output: {{"date": "Monday", "time": null, "persons": null}}

Input: Book for 12pm, 2 people
Output: {{"date": null, "time": "12 pm", "persons": "2"}}

Now extract from this:
"{user_message}""#,
        marker = PromptKind::Extract.marker(),
        user_message = user_message,
    )
}

/// Knowledge question prompt with the whole fact table inlined
pub fn knowledge_prompt(user_message: &str, kb_content: &str) -> String {
    format!(
        r#"You are a helpful AI assistant with access to general world knowledge. Use the following knowledge base to answer the user's question.

{marker}
{kb_content}

User question: "{user_message}"

Instructions:
- Answer from the knowledge base above.
- If the question is not covered by the knowledge base, politely say you don't have information on that.
- After answering, politely remind the user that you can help with table reservations, without adding another question.

Provide a short helpful answer, then redirect to reservations."#,
        marker = PromptKind::Knowledge.marker(),
        kb_content = kb_content,
        user_message = user_message,
    )
}

/// Correction prompt for false or contradictory statements
pub fn contradiction_prompt(user_message: &str) -> String {
    format!(
        r#"The user made a statement that {marker}: "{user_message}"

Politely correct the misinformation with the accurate facts in just one sentence.
After the correction, invite the customer to continue the reservation conversation without asking an extra question.

Keep the response precise and short, and redirect to restaurant services."#,
        marker = PromptKind::Contradiction.marker(),
        user_message = user_message,
    )
}
