use crate::metrics::ScoreHistory;

/// Plot episode scores (`*`) and their running mean (`o`) as ASCII art.
pub fn plot_scores(history: &ScoreHistory, width: usize, height: usize) -> String {
    if history.scores.is_empty() {
        return "No score data available".to_string();
    }
    let scores: Vec<f32> = history.scores.iter().map(|&s| s as f32).collect();
    let mut output = plot_series(
        &[(scores.as_slice(), '*'), (history.mean_scores.as_slice(), 'o')],
        "Objects Found per Simulation",
        width,
        height,
    );
    if let (Some(&last), Some(mean)) = (history.scores.last(), history.mean_score()) {
        let record = history.record();
        output.push_str(&format!("Last: {}  Mean: {:.2}  Record: {}\n", last, mean, record));
    }
    output
}

/// Plot arbitrary series as ASCII art
pub fn plot_metrics(values: &[f32], title: &str, width: usize, height: usize) -> String {
    plot_series(&[(values, '*')], title, width, height)
}

/// Series plotter sharing one y axis starting at zero.
fn plot_series(series: &[(&[f32], char)], title: &str, width: usize, height: usize) -> String {
    let len = series.iter().map(|(values, _)| values.len()).max().unwrap_or(0);
    if len == 0 || width < 10 || height < 5 {
        return format!("{}: Invalid data or dimensions", title);
    }

    let max_val = series
        .iter()
        .flat_map(|(values, _)| values.iter().copied())
        .fold(0.0f32, f32::max);
    let min_val = series
        .iter()
        .flat_map(|(values, _)| values.iter().copied())
        .fold(0.0f32, f32::min);

    let mut plot = vec![vec![' '; width]; height];

    // Add axes
    for row in plot.iter_mut() {
        row[0] = '|';
    }
    for j in 0..width {
        plot[height - 1][j] = '-';
    }
    plot[height - 1][0] = '+';

    let x_span = (len.max(2) - 1) as f32;
    let y_span = (max_val - min_val).max(f32::EPSILON);
    for &(values, glyph) in series {
        for (i, &value) in values.iter().enumerate() {
            let x = (2 + (i as f32 / x_span * (width - 3) as f32) as usize).min(width - 1);
            let level = ((value - min_val) / y_span * (height - 2) as f32) as usize;
            let y = (height - 2).saturating_sub(level);
            plot[y][x] = glyph;
        }
    }

    // Build output string
    let mut output = format!("{}\n", title);
    output.push_str(&format!("Max: {:.2}\n", max_val));
    for row in plot.iter() {
        output.push_str(&row.iter().collect::<String>());
        output.push('\n');
    }
    output.push_str(&format!("Min: {:.2}\n", min_val));
    output.push_str(&format!("Points: {}\n", len));

    output
}

/// One-line training progress summary
pub fn training_progress(
    episode: usize,
    total_episodes: Option<usize>,
    score: usize,
    record: usize,
    mean_score: f32,
    epsilon: u32,
) -> String {
    match total_episodes {
        Some(total) => {
            let progress = episode as f32 / total.max(1) as f32;
            let bar_length = 30;
            let filled = ((progress * bar_length as f32) as usize).min(bar_length);
            let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(bar_length - filled));
            format!(
                "Game {}/{} {} {:.1}% | Score: {} | Record: {} | Mean: {:.2} | eps: {}",
                episode, total, bar, progress * 100.0, score, record, mean_score, epsilon
            )
        }
        None => format!(
            "Game {} | Score: {} | Record: {} | Mean: {:.2} | eps: {}",
            episode, score, record, mean_score, epsilon
        ),
    }
}
