mod configuration;
mod payload;
