mod test_round_trip;
