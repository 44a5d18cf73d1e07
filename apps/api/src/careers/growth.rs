use tracing::info;

use crate::careers::validation::validate_sector;
use crate::errors::AppError;
use crate::generator::{invoke_typed, Generator, GeneratorError, Script};
use crate::models::career::GrowthChart;

const CHART_FAILURE: &str = "Failed to generate growth chart data";

/// Generates a fresh growth chart for `sector`. Nothing is persisted.
pub async fn generate_growth_chart(
    generator: &dyn Generator,
    sector: &str,
) -> Result<GrowthChart, AppError> {
    let sector = validate_sector(sector)?;

    let chart: GrowthChart = invoke_typed(generator, Script::GrowthChart, &[sector.clone()])
        .await
        .map_err(|e| AppError::generation(CHART_FAILURE, e))?;
    chart
        .validate()
        .map_err(|reason| AppError::generation(CHART_FAILURE, GeneratorError::Invalid(reason)))?;

    info!(
        "Generated growth chart for '{sector}' ({} points)",
        chart.labels.len()
    );
    Ok(chart)
}
