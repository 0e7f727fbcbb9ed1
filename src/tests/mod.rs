mod test_memory;
