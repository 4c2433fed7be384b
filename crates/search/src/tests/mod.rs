mod normalize_cases;
