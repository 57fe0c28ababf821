//! Text report rendering

use blueprint_core::display::{
    category_icon, format_compact, format_thousands, ImpactLevel, DISCLAIMER,
};
use blueprint_core::{
    relatable_comparison, AnalysisError, AnalysisResult, ConversionRates, ErrorKind,
    ImpactMetrics,
};

use crate::session::SessionInsights;

const RULE: &str = "   ─────────────────────────────────────────────────────────────";

/// Contextual follow-ups for a failed analysis
pub fn error_hints(err: &AnalysisError) -> Vec<&'static str> {
    match err.kind {
        ErrorKind::RateLimit => vec![
            "🔗 Check API usage: https://aistudio.google.com/usage",
            "Wait a few minutes or upgrade your plan",
        ],
        ErrorKind::AuthError => vec![
            "🔑 Verify GEMINI_API_KEY is set in your environment or config",
            "Get key at: https://aistudio.google.com/apikey",
        ],
        ErrorKind::ModelNotFound => {
            vec!["🔧 Set [model] name or GEMINI_MODEL to a model you can access"]
        }
        _ if err.retry_suggested => {
            vec!["💡 Tips: Clear photo • Good lighting • Single product"]
        }
        _ => Vec::new(),
    }
}

pub fn print_analysis_error(source: &str, err: &AnalysisError, verbose: bool) {
    println!();
    println!("⚠️  Analysis Failed: {}", source);
    println!("   {}", err.user_friendly_message);
    for hint in error_hints(err) {
        println!("   {}", hint);
    }
    if verbose {
        println!();
        println!("   🔍 Technical Details");
        println!("   Type: {}", err.kind);
        println!("   Message: {}", err.message);
    }
}

pub fn print_result(source: &str, result: &AnalysisResult, rates: &ConversionRates) {
    let metrics = ImpactMetrics::from_total_liters(result.total_liters, rates);
    let level = ImpactLevel::from_liters(result.total_liters);
    let swap = &result.sustainable_swap;

    println!();
    println!(
        "{} {}  ({})",
        category_icon(&result.product_category),
        result.product_name,
        source
    );
    println!("{}", RULE);
    println!("   Category:    {}", result.product_category);
    println!("   Impact:      {} - {}", level.label(), level.description());
    println!("   Confidence:  {:.0}%", result.confidence_score * 100.0);
    println!();
    println!("   💧 Water:      {} L", format_thousands(result.total_liters));
    println!("   🌍 Carbon:     {:.1} kg CO₂", result.carbon_kg);
    println!("   Equivalent:   {}", relatable_comparison(result.total_liters));
    println!(
        "   Drinking:     {} days",
        format_thousands(metrics.daily_drinking_equivalent)
    );
    println!("   Savings:      {:.0}% potential", swap.savings_percentage);

    println!();
    println!("   Water types");
    println!(
        "   🟢 Green {:>5.1}%  {:>10} L  (rainwater)",
        result.breakdown.green_water_pct,
        format_thousands(result.green_water_liters())
    );
    println!(
        "   🔵 Blue  {:>5.1}%  {:>10} L  (surface/ground)",
        result.breakdown.blue_water_pct,
        format_thousands(result.blue_water_liters())
    );
    println!(
        "   ⚫ Grey  {:>5.1}%  {:>10} L  (polluted)",
        result.breakdown.grey_water_pct,
        format_thousands(result.grey_water_liters())
    );

    println!();
    println!("   🔄 Real-world comparison: {}", metrics.best_comparison());
    println!(
        "      {} shower minutes • {} toilet flushes • {} dishwasher cycles • {} laundry loads",
        format_compact(metrics.shower_minutes_equivalent),
        format_compact(metrics.toilet_flushes_equivalent),
        format_compact(metrics.dishwasher_cycles_equivalent),
        format_compact(metrics.washing_machine_cycles_equivalent)
    );

    if let Some(regional) = &result.regional_impact {
        println!();
        println!(
            "   🌍 Regional impact (scarcity x{:.1})",
            regional.scarcity_multiplier
        );
        if !regional.high_stress_regions.is_empty() {
            println!("      Regions: {}", regional.high_stress_regions.join(", "));
        }
        if !regional.context.is_empty() {
            println!("      {}", regional.context);
        }
    }

    println!();
    println!("   🌱 Recommended switch: {}", swap.product_name);
    println!(
        "      Water: {}L (save {}L)",
        format_thousands(swap.water_liters),
        format_thousands(swap.savings_liters)
    );
    println!(
        "      CO₂:   {:.1}kg (save {:.1}kg)",
        swap.carbon_kg,
        carbon_saving(result)
    );
    println!("      {}", swap.reasoning);

    if !result.actionable_steps.is_empty() {
        println!();
        println!("   ✅ Take action");
        for (i, step) in result.actionable_steps.iter().enumerate() {
            println!("      Step {}: {}", i + 1, step);
        }
    }
    if let Some(collective) = &result.collective_impact {
        println!();
        println!("   🌍 Collective power: {}", collective);
    }
    if let Some(fact) = &result.fun_fact {
        println!();
        println!("   💡 Did you know? {}", fact);
    }

    println!();
    println!("   📚 Source: {}", result.data_source);
}

/// Carbon saved by taking the swap, never below zero
pub fn carbon_saving(result: &AnalysisResult) -> f64 {
    (result.carbon_kg - result.sustainable_swap.carbon_kg).max(0.0)
}

pub fn print_insights(insights: &SessionInsights) {
    println!();
    println!("📊 Your Impact");
    println!("{}", RULE);
    println!(
        "   Session started {}",
        insights.started_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "   💧 Water: {}L    🌍 Carbon: {:.0}kg",
        format_compact(insights.total_water),
        insights.total_carbon
    );
    if insights.failures > 0 {
        println!("   ({} image(s) could not be analyzed)", insights.failures);
    }

    if let Some(summary) = &insights.summary {
        println!();
        println!(
            "   Items: {}    Avg water: {}L    Avg carbon: {:.1}kg",
            summary.total_items,
            format_thousands(summary.avg_water_per_item),
            summary.avg_carbon_per_item
        );
        println!(
            "   Top category: {} {}",
            category_icon(&summary.top_category),
            summary.top_category
        );
        println!(
            "   Potential savings: {}L water, {:.1}kg CO₂",
            format_thousands(summary.potential_savings_water),
            summary.potential_savings_carbon
        );
    }

    if !insights.patterns.is_empty() {
        println!();
        println!("   🔎 Patterns");
        for pattern in &insights.patterns {
            println!("      • {}", pattern);
        }
    }

    if let Some(milestone) = &insights.milestone {
        println!();
        match &milestone.next {
            Some(next) => {
                println!("   🎯 Progress");
                println!(
                    "      {} {} → {}  ({:.0}%)",
                    milestone.current_icon, milestone.current, next.title, next.progress_pct
                );
                println!("      {}L to next level", format_thousands(next.remaining));
            }
            None => {
                println!(
                    "   🎯 {} {}: {}",
                    milestone.current_icon, milestone.current, milestone.current_desc
                );
            }
        }
    }

    let challenge = &insights.challenge;
    println!();
    println!("   {} Weekly challenge: {}", challenge.icon, challenge.title);
    println!("      {}", challenge.description);
    println!(
        "      Progress: {}/{}    Reward: {}",
        challenge.current, challenge.target, challenge.reward
    );
    if let Some(tip) = &challenge.tip {
        println!("      Tip: {}", tip);
    }

    println!();
    println!("   {}", DISCLAIMER);
    println!();
}
