use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// The fixed questionnaire, in the column order used by the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Question {
    Purpose,
    GrindingCapacity,
    Voltage,
    MaterialType,
    EasyCleaning,
    NoiseSensitive,
    LimitedSpace,
    Budget,
    Regrinding,
    Power,
}

impl Question {
    pub const ALL: [Question; 10] = [
        Question::Purpose,
        Question::GrindingCapacity,
        Question::Voltage,
        Question::MaterialType,
        Question::EasyCleaning,
        Question::NoiseSensitive,
        Question::LimitedSpace,
        Question::Budget,
        Question::Regrinding,
        Question::Power,
    ];

    /// JSON field carrying the answer in a `/predict` request.
    pub fn field(self) -> &'static str {
        match self {
            Question::Purpose => "finalidade",
            Question::GrindingCapacity => "quantidade",
            Question::Voltage => "voltagem",
            Question::MaterialType => "tipo_material",
            Question::EasyCleaning => "facil_limpeza",
            Question::NoiseSensitive => "ruido_importante",
            Question::LimitedSpace => "espaco_limitado",
            Question::Budget => "orcamento",
            Question::Regrinding => "remoagem",
            Question::Power => "potencia",
        }
    }

    /// Question text as shown to customers; doubles as the model's feature name.
    pub fn text(self) -> &'static str {
        match self {
            Question::Purpose => "Para qual finalidade pretende usar o moedor?",
            Question::GrindingCapacity => "Quantos quilos precisa moer por minuto?",
            Question::Voltage => "Qual é a voltagem que pretende utilizar?",
            Question::MaterialType => "O que irá moer?",
            Question::EasyCleaning => "Prefere modelo mais fácil de limpar?",
            Question::NoiseSensitive => "Ruído é um fator importante?",
            Question::LimitedSpace => "O espaço físico é limitado?",
            Question::Budget => "Qual é a faixa de orçamento?",
            Question::Regrinding => "Deseja função de remoagem?",
            Question::Power => "Potência desejada",
        }
    }
}

/// Raw `/predict` payload. Every field is required, but presence is checked in
/// [`QuestionnaireRequest::into_answers`] so the caller gets one message listing
/// everything that is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireRequest {
    #[serde(default)]
    pub finalidade: Option<String>,
    #[serde(default)]
    pub quantidade: Option<String>,
    #[serde(default)]
    pub voltagem: Option<String>,
    #[serde(default)]
    pub tipo_material: Option<String>,
    #[serde(default)]
    pub facil_limpeza: Option<String>,
    #[serde(default)]
    pub ruido_importante: Option<String>,
    #[serde(default)]
    pub espaco_limitado: Option<String>,
    #[serde(default)]
    pub orcamento: Option<String>,
    #[serde(default)]
    pub remoagem: Option<String>,
    #[serde(default)]
    pub potencia: Option<String>,
}

impl QuestionnaireRequest {
    /// Reads a `/predict` body.
    ///
    /// An empty, non-JSON, `null` or `{}` body carries no answers at all. Any
    /// other JSON object is accepted field by field: a field that is absent or
    /// not a string stays unanswered and is reported by
    /// [`QuestionnaireRequest::into_answers`].
    pub fn from_body(body: &[u8]) -> Result<Self, NoAnswers> {
        let fields = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) if !fields.is_empty() => fields,
            _ => return Err(NoAnswers),
        };

        let mut request = Self::default();
        for question in Question::ALL {
            *request.slot_mut(question) = fields
                .get(question.field())
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        Ok(request)
    }

    fn slot(&self, question: Question) -> &Option<String> {
        match question {
            Question::Purpose => &self.finalidade,
            Question::GrindingCapacity => &self.quantidade,
            Question::Voltage => &self.voltagem,
            Question::MaterialType => &self.tipo_material,
            Question::EasyCleaning => &self.facil_limpeza,
            Question::NoiseSensitive => &self.ruido_importante,
            Question::LimitedSpace => &self.espaco_limitado,
            Question::Budget => &self.orcamento,
            Question::Regrinding => &self.remoagem,
            Question::Power => &self.potencia,
        }
    }

    fn slot_mut(&mut self, question: Question) -> &mut Option<String> {
        match question {
            Question::Purpose => &mut self.finalidade,
            Question::GrindingCapacity => &mut self.quantidade,
            Question::Voltage => &mut self.voltagem,
            Question::MaterialType => &mut self.tipo_material,
            Question::EasyCleaning => &mut self.facil_limpeza,
            Question::NoiseSensitive => &mut self.ruido_importante,
            Question::LimitedSpace => &mut self.espaco_limitado,
            Question::Budget => &mut self.orcamento,
            Question::Regrinding => &mut self.remoagem,
            Question::Power => &mut self.potencia,
        }
    }

    fn answer(&self, question: Question) -> Option<&str> {
        self.slot(question)
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Maps the request onto question texts, rejecting blank or absent answers.
    pub fn into_answers(self) -> Result<Answers, MissingAnswers> {
        let mut answers = Answers::default();
        let mut missing = Vec::new();

        for question in Question::ALL {
            match self.answer(question) {
                Some(value) => answers.insert(question.text(), value),
                None => missing.push(question.text()),
            }
        }

        if missing.is_empty() {
            Ok(answers)
        } else {
            Err(MissingAnswers { questions: missing })
        }
    }
}

/// The body carried nothing that could be read as answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("No answers provided")]
pub struct NoAnswers;

/// Boundary validation failure listing the unanswered questions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing answers: {}", .questions.join(", "))]
pub struct MissingAnswers {
    pub questions: Vec<&'static str>,
}

/// Question text to answer, keeping insertion order.
///
/// Order matters: the rule fallback reports answers in the order they were
/// given, and the response echoes them in questionnaire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    entries: Vec<(String, String)>,
}

impl Answers {
    /// Replaces the value in place when the question is already present.
    pub fn insert(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let question = question.into();
        let answer = answer.into();
        match self.entries.iter_mut().find(|(key, _)| *key == question) {
            Some(entry) => entry.1 = answer,
            None => self.entries.push((question, answer)),
        }
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == question)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Answers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = Answers::default();
        for (question, answer) in iter {
            answers.insert(question, answer);
        }
        answers
    }
}

impl Serialize for Answers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (question, answer) in &self.entries {
            map.serialize_entry(question, answer)?;
        }
        map.end()
    }
}
