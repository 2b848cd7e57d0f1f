use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::recommendation::encoding::{EncodingTable, FallbackEncoder, TargetEncoder};
use crate::recommendation::model::{
    ArtifactSource, DecisionTree, EncoderArtifact, ModelBundle, ModelLoadError, TREE_LEAF,
    TREE_UNDEFINED,
};
use crate::recommendation::questionnaire::{Answers, Question, QuestionnaireRequest};
use crate::recommendation::service::PredictionService;

pub(super) const COMMERCIAL: &str = "Moedor Comercial C-22";
pub(super) const HOUSEHOLD: &str = "Moedor Doméstico MD-5";
pub(super) const INDUSTRIAL: &str = "Moedor Industrial I-98";

pub(super) fn feature_names() -> Vec<String> {
    Question::ALL
        .iter()
        .map(|question| question.text().to_string())
        .collect()
}

fn feature(question: Question) -> i64 {
    Question::ALL
        .iter()
        .position(|candidate| *candidate == question)
        .expect("question listed") as i64
}

/// Tree over the standard questionnaire columns.
///
/// ```text
/// 0 purpose <= 2.5 (120)
/// ├── 1 capacity <= 2.5 (70)
/// │   ├── 2 voltage <= 2.5 (40)
/// │   │   ├── 3 leaf commercial (25)
/// │   │   └── 4 leaf industrial (15)
/// │   └── 5 leaf industrial (30)
/// └── 6 budget <= 1.5 (50)
///     ├── 7 leaf household (30)
///     └── 8 power <= 1.5 (20)
///         ├── 9 leaf household (12)
///         └── 10 leaf commercial (8)
/// ```
pub(super) fn grinder_tree() -> DecisionTree {
    let leaf = TREE_UNDEFINED;
    DecisionTree {
        children_left: vec![1, 2, 3, TREE_LEAF, TREE_LEAF, TREE_LEAF, 7, TREE_LEAF, 9, TREE_LEAF, TREE_LEAF],
        children_right: vec![6, 5, 4, TREE_LEAF, TREE_LEAF, TREE_LEAF, 8, TREE_LEAF, 10, TREE_LEAF, TREE_LEAF],
        feature: vec![
            feature(Question::Purpose),
            feature(Question::GrindingCapacity),
            feature(Question::Voltage),
            leaf,
            leaf,
            leaf,
            feature(Question::Budget),
            leaf,
            feature(Question::Power),
            leaf,
            leaf,
        ],
        threshold: vec![2.5, 2.5, 2.5, -2.0, -2.0, -2.0, 1.5, -2.0, 1.5, -2.0, -2.0],
        n_node_samples: vec![120, 70, 40, 25, 15, 30, 50, 30, 20, 12, 8],
        // Class order follows the target encoder: commercial, household, industrial.
        value: vec![
            vec![33.0, 42.0, 45.0],
            vec![25.0, 0.0, 45.0],
            vec![25.0, 0.0, 15.0],
            vec![25.0, 0.0, 0.0],
            vec![0.0, 0.0, 15.0],
            vec![0.0, 0.0, 30.0],
            vec![8.0, 42.0, 0.0],
            vec![0.0, 30.0, 0.0],
            vec![8.0, 12.0, 0.0],
            vec![0.0, 12.0, 0.0],
            vec![8.0, 0.0, 0.0],
        ],
    }
}

pub(super) fn encoder_artifact() -> EncoderArtifact {
    let table = EncodingTable::standard();
    let mut label_encoders = std::collections::BTreeMap::new();
    for entry in table.features() {
        label_encoders.insert(
            entry.feature.to_string(),
            FallbackEncoder::fit(entry.categories.iter().copied()),
        );
    }
    label_encoders.insert(
        Question::Voltage.text().to_string(),
        FallbackEncoder::fit(["127V", "220V", "Trifásico", "Bivolt"]),
    );

    EncoderArtifact {
        label_encoders,
        y_encoder: TargetEncoder::fit([HOUSEHOLD, INDUSTRIAL, COMMERCIAL]),
        feature_names: feature_names(),
    }
}

/// Serialized artifacts held in memory, deserialized on every load.
pub(super) struct StaticArtifacts {
    pub(super) tree: Vec<u8>,
    pub(super) encoders: Vec<u8>,
}

impl StaticArtifacts {
    pub(super) fn new(tree: &DecisionTree, encoders: &EncoderArtifact) -> Self {
        Self {
            tree: serde_json::to_vec(tree).expect("tree serializes"),
            encoders: serde_json::to_vec(encoders).expect("encoders serialize"),
        }
    }
}

impl ArtifactSource for StaticArtifacts {
    fn load(&self) -> Result<ModelBundle, ModelLoadError> {
        ModelBundle::from_artifacts(&self.tree, &self.encoders)
    }
}

pub(super) struct MissingArtifacts;

impl ArtifactSource for MissingArtifacts {
    fn load(&self) -> Result<ModelBundle, ModelLoadError> {
        Err(ModelLoadError::Missing {
            artifact: "tree",
            path: "artifacts/tree.json".to_string(),
        })
    }
}

pub(super) fn grinder_artifacts() -> StaticArtifacts {
    StaticArtifacts::new(&grinder_tree(), &encoder_artifact())
}

pub(super) fn grinder_service() -> Arc<PredictionService<StaticArtifacts>> {
    Arc::new(PredictionService::new(grinder_artifacts()))
}

/// Tree whose inference works but whose node 5 is claimed by the orphan node 1,
/// so no depth can be resolved for it.
pub(super) fn orphan_claim_tree() -> DecisionTree {
    let leaf = TREE_UNDEFINED;
    DecisionTree {
        children_left: vec![2, 5, TREE_LEAF, 4, TREE_LEAF, 6, TREE_LEAF, TREE_LEAF],
        children_right: vec![3, TREE_LEAF, TREE_LEAF, 5, TREE_LEAF, 7, TREE_LEAF, TREE_LEAF],
        feature: vec![0, 0, leaf, 0, leaf, 1, leaf, leaf],
        threshold: vec![0.5, 0.5, -2.0, 0.5, -2.0, 0.5, -2.0, -2.0],
        n_node_samples: vec![40, 10, 10, 30, 10, 20, 12, 8],
        value: vec![
            vec![20.0, 20.0],
            vec![5.0, 5.0],
            vec![10.0, 0.0],
            vec![10.0, 20.0],
            vec![10.0, 0.0],
            vec![0.0, 20.0],
            vec![0.0, 12.0],
            vec![0.0, 8.0],
        ],
    }
}

pub(super) fn orphan_claim_artifacts() -> StaticArtifacts {
    let mut label_encoders = std::collections::BTreeMap::new();
    label_encoders.insert("Q1".to_string(), FallbackEncoder::fit(["Sim", "Não"]));
    label_encoders.insert(
        "Q2".to_string(),
        FallbackEncoder::fit(["Doméstico", "Industrial"]),
    );
    let encoders = EncoderArtifact {
        label_encoders,
        y_encoder: TargetEncoder::fit([COMMERCIAL, HOUSEHOLD]),
        feature_names: vec!["Q1".to_string(), "Q2".to_string()],
    };
    StaticArtifacts::new(&orphan_claim_tree(), &encoders)
}

pub(super) fn household_request() -> QuestionnaireRequest {
    QuestionnaireRequest {
        finalidade: Some("Doméstico".to_string()),
        quantidade: Some("Até 1Kg".to_string()),
        voltagem: Some("127V".to_string()),
        tipo_material: Some("Carne, Frango".to_string()),
        facil_limpeza: Some("Sim".to_string()),
        ruido_importante: Some("Sim".to_string()),
        espaco_limitado: Some("Sim".to_string()),
        orcamento: Some("Até R$ 2,500,00".to_string()),
        remoagem: Some("Não".to_string()),
        potencia: Some("Até 0,25kW".to_string()),
    }
}

pub(super) fn commercial_request() -> QuestionnaireRequest {
    QuestionnaireRequest {
        finalidade: Some("Comercial".to_string()),
        quantidade: Some("Até 1Kg".to_string()),
        voltagem: Some("220V".to_string()),
        tipo_material: Some("Embutidos".to_string()),
        facil_limpeza: Some("Sim".to_string()),
        ruido_importante: Some("Não".to_string()),
        espaco_limitado: Some("Não".to_string()),
        orcamento: Some("Até R$ 15,000,00".to_string()),
        remoagem: Some("Sim".to_string()),
        potencia: Some("Até 2,2kW".to_string()),
    }
}

pub(super) fn answers(request: QuestionnaireRequest) -> Answers {
    request.into_answers().expect("complete request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
