mod tests_edit;
