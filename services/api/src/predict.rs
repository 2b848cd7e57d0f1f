use crate::cli::ModelArgs;
use clap::Args;
use grinder_advisor::config::AppConfig;
use grinder_advisor::error::AppError;
use grinder_advisor::recommendation::{
    FileArtifacts, Importance, Prediction, PredictionService, QuestionnaireRequest,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// JSON file shaped like a `/predict` request body
    #[arg(long)]
    pub(crate) answers: PathBuf,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs { answers, mut model } = args;

    let mut config = AppConfig::load()?;
    model.apply(&mut config.model);

    let payload = std::fs::read(&answers)?;
    let answers = QuestionnaireRequest::from_body(&payload)?.into_answers()?;

    let service = PredictionService::new(FileArtifacts::from_config(&config.model));
    let prediction = service.predict(&answers)?;

    print!("{}", render_prediction(&prediction));
    Ok(())
}

pub(crate) fn render_prediction(prediction: &Prediction) -> String {
    let mut out = format!("Recommended grinder: {}\n", prediction.product);

    if prediction.rules.is_empty() {
        out.push_str("No deciding answers could be identified\n");
        return out;
    }

    out.push_str("Deciding answers\n");
    for rule in &prediction.rules {
        let importance = match rule.importance {
            Importance::High => "high",
            Importance::Medium => "medium",
        };
        out.push_str(&format!(
            "- [{}] {} {}\n",
            importance, rule.question, rule.answer
        ));
    }
    out
}
