use crate::output::Output;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompt for a secret (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for yes/no with optional default
pub fn prompt_yes_no(prompt: &str, default: Option<bool>) -> Result<bool> {
    let mut confirm_builder = Confirm::new().with_prompt(prompt);

    if let Some(default_value) = default {
        confirm_builder = confirm_builder.default(default_value);
    }

    confirm_builder
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

/// Ask for a star rating until the answer is within 1..=max.
pub fn prompt_rating(max_rating: u8, output: &Output) -> Result<u8> {
    loop {
        let input_str = Input::<String>::new()
            .with_prompt(format!("Your rating (1-{})", max_rating))
            .interact()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))?;

        match parse_rating(&input_str, max_rating) {
            Some(rating) => return Ok(rating),
            None => output.error(format!("Please enter a number from 1 to {}.", max_rating)),
        }
    }
}

pub fn parse_rating(input: &str, max_rating: u8) -> Option<u8> {
    input
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|r| (1..=max_rating).contains(r))
}
