mod tests_outline;
